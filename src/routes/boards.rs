//! Board routes — §4.1.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::{BoardId, Column, IdentityHash};
use crate::services::{CreateBoardInput, DeleteAuthorization};
use crate::state::AppState;

use super::error::app_error_response;
use super::identity::Identity;

const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

#[derive(Deserialize)]
pub struct CreateBoardBody {
    pub name: String,
    pub columns: Vec<Column>,
    pub card_limit: Option<u32>,
    pub reaction_limit: Option<u32>,
}

/// `POST /api/boards`
pub async fn create_board(state: State<AppState>, Identity(identity): Identity, Json(body): Json<CreateBoardBody>) -> Response {
    let input = CreateBoardInput { name: body.name, columns: body.columns, card_limit: body.card_limit, reaction_limit: body.reaction_limit };
    match state.boards.create_board(input, &identity).await {
        Ok(board) => Json(board).into_response(),
        Err(err) => app_error_response(err),
    }
}

fn parse_board_id(raw: &str) -> Result<BoardId, Response> {
    raw.parse().map_err(app_error_response)
}

/// `GET /api/boards/:id`
pub async fn get_board(state: State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.boards.get_board(id).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `GET /api/boards/by-link/:link`
pub async fn get_board_by_link(state: State<AppState>, Path(link): Path<String>) -> Response {
    let link = crate::domain::ShareableLink::new(link);
    match state.boards.get_board_by_link(&link).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct RenameBoardBody {
    pub name: String,
}

/// `PATCH /api/boards/:id`
pub async fn rename_board(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(id): Path<String>,
    Json(body): Json<RenameBoardBody>,
) -> Response {
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.boards.rename_board(id, &body.name, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct RenameColumnBody {
    pub name: String,
}

/// `PATCH /api/boards/:id/columns/:column_id`
pub async fn rename_column(
    state: State<AppState>,
    Identity(identity): Identity,
    Path((id, column_id)): Path<(String, String)>,
    Json(body): Json<RenameColumnBody>,
) -> Response {
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.boards.rename_column(id, &column_id, &body.name, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `POST /api/boards/:id/close`
pub async fn close_board(state: State<AppState>, Identity(identity): Identity, Path(id): Path<String>) -> Response {
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.boards.close_board(id, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct AddAdminBody {
    /// The target's already-known identity hash (e.g. surfaced via
    /// `GET /api/boards/:id` active users) — not re-derived from a cookie,
    /// since the caller is granting admin to *someone else's* identity.
    pub target_identity_hash: String,
}

/// `POST /api/boards/:id/admins`
pub async fn add_admin(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(id): Path<String>,
    Json(body): Json<AddAdminBody>,
) -> Response {
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let target = IdentityHash::from_hashed(body.target_identity_hash);
    match state.boards.add_admin(id, &target, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `DELETE /api/boards/:id`. Authorized by the caller's identity (must be
/// the creator) or by an `X-Admin-Secret` header.
pub async fn delete_board(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let id = match parse_board_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let auth = match headers.get(ADMIN_SECRET_HEADER).and_then(|v| v.to_str().ok()) {
        Some(secret) => DeleteAuthorization::AdminSecret(secret),
        None => DeleteAuthorization::Identity(&identity),
    };
    match state.boards.delete_board(id, auth).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}
