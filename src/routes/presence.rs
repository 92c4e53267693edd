//! Presence routes — §4.4.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::BoardId;
use crate::state::AppState;

use super::error::app_error_response;
use super::identity::Identity;

fn parse_board_id(raw: &str) -> Result<BoardId, Response> {
    raw.parse().map_err(app_error_response)
}

#[derive(Deserialize)]
pub struct AliasBody {
    pub alias: String,
}

/// `POST /api/boards/:board_id/presence`
pub async fn join(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(board_id): Path<String>,
    Json(body): Json<AliasBody>,
) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.presence.join(board_id, &body.alias, &identity).await {
        Ok(active) => Json(active).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `POST /api/boards/:board_id/presence/heartbeat`
pub async fn heartbeat(state: State<AppState>, Identity(identity): Identity, Path(board_id): Path<String>) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.presence.heartbeat(board_id, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `PATCH /api/boards/:board_id/presence`
pub async fn update_alias(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(board_id): Path<String>,
    Json(body): Json<AliasBody>,
) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.presence.update_alias(board_id, &body.alias, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `GET /api/boards/:board_id/presence`
pub async fn active_users(state: State<AppState>, Path(board_id): Path<String>) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.presence.active_users(board_id).await {
        Ok(users) => Json(users).into_response(),
        Err(err) => app_error_response(err),
    }
}
