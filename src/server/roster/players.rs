use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use super::ensure_team_exists;
use crate::server::AppState;
use crate::server::dto::{
    AssignTeamRequest, CreatePlayerRequest, ListPlayersParams, UpdatePlayerRequest,
};
use crate::server::response::{
    ApiError, ApiJson, ApiQuery, MessageResponse, StoreDeleteExt, StoreOptionExt,
    StoreResultExt, WithMessage,
};
use crate::server::validation::{
    non_empty, normalize_team_id, require_name, validate_name_change,
};
use crate::types::Player;

fn player_not_found(id: &str) -> impl FnOnce() -> String + '_ {
    move || format!("El jugador con ID '{id}' no fue encontrado")
}

/// GET /players - Supports ?teamId=... and ?isFreeAgent=true
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListPlayersParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let players = store
        .list_players(&params.filter())
        .api_err("Error al obtener los jugadores")?;

    Ok::<_, ApiError>(Json(players))
}

/// POST /players - An unknown team_id rejects the request; nothing is created
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePlayerRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let name = require_name(req.name)?;
    let team_id = normalize_team_id(req.team_id);

    if let Some(team_id) = &team_id {
        ensure_team_exists(store, team_id, "Error al crear el jugador")?;
    }

    let now = Utc::now();
    let player = Player {
        id: Uuid::new_v4().to_string(),
        name,
        bio: non_empty(req.bio),
        stats: req.stats,
        photo_url: non_empty(req.photo_url),
        team_id,
        created_at: now,
        updated_at: now,
    };

    store
        .create_player(&player)
        .api_err("Error al crear el jugador")?;
    tracing::info!(player_id = %player.id, "Created player '{}'", player.name);

    let created = store
        .get_player_with_team(&player.id)
        .api_err("Error al crear el jugador")?
        .or_not_found(player_not_found(&player.id))?;

    Ok::<_, ApiError>((StatusCode::CREATED, Json(created)))
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let player = store
        .get_player_with_team(&id)
        .api_err("Error al obtener el jugador")?
        .or_not_found(player_not_found(&id))?;

    Ok::<_, ApiError>(Json(player))
}

/// PATCH /players/{id} - Only fields present in the body change
pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdatePlayerRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let mut player = store
        .get_player(&id)
        .api_err("Error al actualizar el jugador")?
        .or_not_found(player_not_found(&id))?;

    let name = validate_name_change(req.name)?;
    let team_id = req.team_id.map(normalize_team_id);

    if let Some(Some(team_id)) = &team_id {
        ensure_team_exists(store, team_id, "Error al actualizar el jugador")?;
    }

    if let Some(name) = name {
        player.name = name;
    }
    if let Some(team_id) = team_id {
        player.team_id = team_id;
    }
    if let Some(bio) = req.bio {
        player.bio = bio;
    }
    if let Some(stats) = req.stats {
        player.stats = stats;
    }
    if let Some(photo_url) = req.photo_url {
        player.photo_url = photo_url;
    }
    player.updated_at = Utc::now();

    store
        .update_player(&player)
        .api_err_or_not_found("Error al actualizar el jugador", player_not_found(&id))?;

    let updated = store
        .get_player_with_team(&player.id)
        .api_err("Error al actualizar el jugador")?
        .or_not_found(player_not_found(&player.id))?;

    Ok::<_, ApiError>(Json(updated))
}

pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let player = store
        .get_player(&id)
        .api_err("Error al eliminar el jugador")?
        .or_not_found(player_not_found(&id))?;

    store
        .delete_player(&player.id)
        .deleted_or_not_found("Error al eliminar el jugador", player_not_found(&id))?;
    tracing::info!(player_id = %player.id, "Deleted player '{}'", player.name);

    Ok::<_, ApiError>(Json(MessageResponse::new(format!(
        "El jugador '{}' ha sido eliminado exitosamente",
        player.name
    ))))
}

/// PATCH /players/{id}/assign-team - `team_id: null` releases the player
pub async fn assign_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AssignTeamRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let mut player = store
        .get_player(&id)
        .api_err("Error al asignar el jugador al equipo")?
        .or_not_found(player_not_found(&id))?;

    let team_id = req.team_id.map(normalize_team_id).ok_or_else(|| {
        ApiError::validation("El campo team_id es obligatorio (use null para liberar al jugador)")
    })?;

    if let Some(team_id) = &team_id {
        ensure_team_exists(store, team_id, "Error al asignar el jugador al equipo")?;
    }

    player.team_id = team_id;
    player.updated_at = Utc::now();

    store
        .update_player(&player)
        .api_err_or_not_found("Error al asignar el jugador al equipo", player_not_found(&id))?;

    let updated = store
        .get_player_with_team(&player.id)
        .api_err("Error al asignar el jugador al equipo")?
        .or_not_found(player_not_found(&player.id))?;

    let action = if updated.player.is_free_agent() {
        "liberado del equipo"
    } else {
        "asignado al equipo"
    };
    tracing::info!(
        player_id = %updated.player.id,
        team_id = ?updated.player.team_id,
        "Player {action}"
    );

    let message = format!(
        "El jugador '{}' ha sido {action} exitosamente",
        updated.player.name
    );

    Ok::<_, ApiError>(Json(WithMessage {
        record: updated,
        message,
    }))
}
