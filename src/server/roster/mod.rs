mod players;
mod teams;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::server::AppState;
use crate::server::response::{ApiError, StoreResultExt};
use crate::store::Store;

pub fn roster_router() -> Router<Arc<AppState>> {
    Router::new()
        // Teams
        .route("/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/teams/{id}",
            get(teams::get_team)
                .patch(teams::update_team)
                .delete(teams::delete_team),
        )
        // Players
        .route(
            "/players",
            get(players::list_players).post(players::create_player),
        )
        .route(
            "/players/{id}",
            get(players::get_player)
                .patch(players::update_player)
                .delete(players::delete_player),
        )
        .route("/players/{id}/assign-team", patch(players::assign_team))
}

/// Referential check run before any player write that sets a team.
fn ensure_team_exists(
    store: &dyn Store,
    team_id: &str,
    failure: &'static str,
) -> Result<(), ApiError> {
    store
        .get_team(team_id)
        .api_err(failure)?
        .map(|_| ())
        .ok_or_else(|| ApiError::team_not_found(team_id))
}
