use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::server::AppState;
use crate::server::dto::{CreateTeamRequest, ListTeamsParams, UpdateTeamRequest};
use crate::server::response::{
    ApiError, ApiJson, ApiQuery, MessageResponse, StoreDeleteExt, StoreOptionExt,
    StoreResultExt,
};
use crate::server::validation::{non_empty, require_name, validate_name_change};
use crate::types::{Player, Team, TeamWithPlayers};

fn team_not_found(id: &str) -> impl FnOnce() -> String + '_ {
    move || format!("El equipo con ID '{id}' no fue encontrado")
}

/// Attaches each player to its team, keeping team order.
fn attach_players(teams: Vec<Team>, players: Vec<Player>) -> Vec<TeamWithPlayers> {
    let mut by_team: HashMap<String, Vec<Player>> = HashMap::new();
    for player in players {
        if let Some(team_id) = player.team_id.clone() {
            by_team.entry(team_id).or_default().push(player);
        }
    }

    teams
        .into_iter()
        .map(|team| {
            let players = by_team.remove(&team.id).unwrap_or_default();
            TeamWithPlayers { team, players }
        })
        .collect()
}

/// GET /teams - All teams, optionally with players (?withPlayers=true)
pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListTeamsParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let teams = store
        .list_teams()
        .api_err("Error al obtener los equipos")?;

    if !params.preload_players() {
        return Ok::<_, ApiError>(Json(teams).into_response());
    }

    let team_ids: Vec<String> = teams.iter().map(|t| t.id.clone()).collect();
    let players = store
        .list_players_for_teams(&team_ids)
        .api_err("Error al obtener los equipos")?;

    Ok(Json(attach_players(teams, players)).into_response())
}

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateTeamRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let name = require_name(req.name)?;
    let now = Utc::now();

    let team = Team {
        id: Uuid::new_v4().to_string(),
        name,
        description: non_empty(req.description),
        achievements: req.achievements,
        created_at: now,
        updated_at: now,
    };

    store.create_team(&team).api_err("Error al crear el equipo")?;
    tracing::info!(team_id = %team.id, "Created team '{}'", team.name);

    Ok::<_, ApiError>((StatusCode::CREATED, Json(team)))
}

/// GET /teams/{id} - Team with its players preloaded
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let team = store
        .get_team(&id)
        .api_err("Error al obtener el equipo")?
        .or_not_found(team_not_found(&id))?;

    let players = store
        .list_team_players(&team.id)
        .api_err("Error al obtener el equipo")?;

    Ok::<_, ApiError>(Json(TeamWithPlayers { team, players }))
}

pub async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTeamRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let mut team = store
        .get_team(&id)
        .api_err("Error al actualizar el equipo")?
        .or_not_found(team_not_found(&id))?;

    if let Some(name) = validate_name_change(req.name)? {
        team.name = name;
    }
    if let Some(description) = req.description {
        team.description = description;
    }
    if let Some(achievements) = req.achievements {
        team.achievements = achievements;
    }
    team.updated_at = Utc::now();

    store
        .update_team(&team)
        .api_err_or_not_found("Error al actualizar el equipo", team_not_found(&id))?;

    Ok::<_, ApiError>(Json(team))
}

/// DELETE /teams/{id} - Players of the team become free agents
pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let team = store
        .get_team(&id)
        .api_err("Error al eliminar el equipo")?
        .or_not_found(team_not_found(&id))?;

    store
        .delete_team(&team.id)
        .deleted_or_not_found("Error al eliminar el equipo", team_not_found(&id))?;
    tracing::info!(team_id = %team.id, "Deleted team '{}'", team.name);

    Ok::<_, ApiError>(Json(MessageResponse::new(format!(
        "El equipo '{}' ha sido eliminado exitosamente",
        team.name
    ))))
}
