//! Administrative back channel routes (§6 "Administrative back channel").
//!
//! Gated entirely by `X-Admin-Secret`; no identity cookie is consulted.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::admin::SeedPlan;
use crate::domain::{BoardId, Column, IdentityHash, ShareableLink};
use crate::state::AppState;

use super::error::app_error_response;

const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let provided = headers.get(ADMIN_SECRET_HEADER).and_then(|v| v.to_str().ok()).unwrap_or("");
    if state.admin.authorize(provided) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED.into_response())
    }
}

fn parse_board_id(raw: &str) -> Result<BoardId, Response> {
    raw.parse().map_err(app_error_response)
}

/// `POST /api/admin/boards/:id/clear`
pub async fn clear_board_data(state: State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.admin.clear_board_data(id).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `POST /api/admin/boards/:id/reset`
pub async fn reset_board(state: State<AppState>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.admin.reset_board(id).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct SeedBoardBody {
    pub name: String,
    pub columns: Vec<Column>,
    pub card_limit: Option<u32>,
    pub reaction_limit: Option<u32>,
    pub creator_identity_hash: String,
    pub shareable_link: String,
}

/// `POST /api/admin/boards/seed`
pub async fn seed_board(state: State<AppState>, headers: HeaderMap, Json(body): Json<SeedBoardBody>) -> Response {
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let plan = SeedPlan {
        name: body.name,
        columns: body.columns,
        card_limit: body.card_limit,
        reaction_limit: body.reaction_limit,
        creator_hash: IdentityHash::from_hashed(body.creator_identity_hash),
        shareable_link: ShareableLink::new(body.shareable_link),
    };
    match state.admin.seed_board(plan).await {
        Ok(board) => Json(board).into_response(),
        Err(err) => app_error_response(err),
    }
}
