//! Reaction routes — §4.3.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::{BoardId, CardId, ReactionKind};
use crate::state::AppState;

use super::error::app_error_response;
use super::identity::Identity;

fn parse_board_id(raw: &str) -> Result<BoardId, Response> {
    raw.parse().map_err(app_error_response)
}

fn parse_card_id(raw: &str) -> Result<CardId, Response> {
    raw.parse().map_err(app_error_response)
}

#[derive(Deserialize)]
pub struct AddReactionBody {
    pub kind: String,
    pub alias: String,
}

/// `POST /api/cards/:card_id/reactions`
pub async fn add_reaction(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(card_id): Path<String>,
    Json(body): Json<AddReactionBody>,
) -> Response {
    let card_id = match parse_card_id(&card_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let kind = match ReactionKind::new(body.kind) {
        Ok(kind) => kind,
        Err(err) => return app_error_response(err),
    };
    match state.reactions.add_reaction(card_id, kind, &identity, &body.alias).await {
        Ok(reaction) => Json(reaction).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `DELETE /api/cards/:card_id/reactions`
pub async fn remove_reaction(state: State<AppState>, Identity(identity): Identity, Path(card_id): Path<String>) -> Response {
    let card_id = match parse_card_id(&card_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.reactions.remove_reaction(card_id, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `GET /api/boards/:board_id/reactions/quota`
pub async fn check_reaction_quota(state: State<AppState>, Identity(identity): Identity, Path(board_id): Path<String>) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.reactions.check_reaction_quota(board_id, &identity).await {
        Ok(quota) => Json(serde_json::json!({
            "current": quota.current,
            "limit": quota.limit,
            "can_react": quota.can_react,
            "limit_enabled": quota.limit_enabled,
        }))
        .into_response(),
        Err(err) => app_error_response(err),
    }
}
