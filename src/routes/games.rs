use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::AppState;

/// Board snapshot for renderers that poll instead of holding a socket
pub async fn get_game_state(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let id = Uuid::parse_str(&game_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let game = state.active_games.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let snapshot = game.session.snapshot();

    Ok(Json(json!({
        "game_id": game_id,
        "created_at": game.created_at,
        "headline": snapshot.outcome.headline(snapshot.mode),
        "state": snapshot,
    })))
}
