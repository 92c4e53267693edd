//! Card routes — §4.2.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::{BoardId, CardId, CardType};
use crate::services::{CardFilter, CreateCardInput, LinkKind};
use crate::state::AppState;

use super::error::app_error_response;
use super::identity::Identity;

fn parse_board_id(raw: &str) -> Result<BoardId, Response> {
    raw.parse().map_err(app_error_response)
}

fn parse_card_id(raw: &str) -> Result<CardId, Response> {
    raw.parse().map_err(app_error_response)
}

fn parse_link_kind(raw: &str) -> Result<LinkKind, Response> {
    match raw {
        "parent_of" => Ok(LinkKind::ParentOf),
        "linked_to" => Ok(LinkKind::LinkedTo),
        other => Err(app_error_response(crate::error::AppError::validation(format!("unknown link kind: {other}")))),
    }
}

#[derive(Deserialize)]
pub struct CreateCardBody {
    pub column_id: String,
    pub content: String,
    pub card_type: CardType,
    pub is_anonymous: bool,
    pub alias: String,
}

/// `POST /api/boards/:board_id/cards`
pub async fn create_card(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(board_id): Path<String>,
    Json(body): Json<CreateCardBody>,
) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let input = CreateCardInput {
        column_id: body.column_id,
        content: body.content,
        card_type: body.card_type,
        is_anonymous: body.is_anonymous,
    };
    match state.cards.create_card(board_id, input, &identity, &body.alias).await {
        Ok(card) => Json(card).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct ListCardsQuery {
    pub column_id: Option<String>,
    pub card_type: Option<CardType>,
    #[serde(default)]
    pub include_relationships: bool,
}

/// `GET /api/boards/:board_id/cards`
pub async fn list_cards(state: State<AppState>, Path(board_id): Path<String>, Query(query): Query<ListCardsQuery>) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let filter = CardFilter { column_id: query.column_id, card_type: query.card_type };
    match state.cards.list_cards(board_id, &filter, query.include_relationships).await {
        Ok(result) => Json(serde_json::json!({
            "cards": result.cards,
            "total_count": result.total_count,
            "cards_by_column": result.cards_by_column,
        }))
        .into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct GetCardQuery {
    #[serde(default)]
    pub include_relationships: bool,
}

/// `GET /api/cards/:id`
pub async fn get_card(state: State<AppState>, Path(id): Path<String>, Query(query): Query<GetCardQuery>) -> Response {
    let id = match parse_card_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.cards.get_card(id, query.include_relationships).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct UpdateCardBody {
    pub content: String,
}

/// `PATCH /api/cards/:id`
pub async fn update_card(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(id): Path<String>,
    Json(body): Json<UpdateCardBody>,
) -> Response {
    let id = match parse_card_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.cards.update_card(id, &body.content, &identity).await {
        Ok(card) => Json(card).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct MoveCardBody {
    pub column_id: String,
}

/// `POST /api/cards/:id/move`
pub async fn move_card(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(id): Path<String>,
    Json(body): Json<MoveCardBody>,
) -> Response {
    let id = match parse_card_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.cards.move_card(id, &body.column_id, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `DELETE /api/cards/:id`
pub async fn delete_card(state: State<AppState>, Identity(identity): Identity, Path(id): Path<String>) -> Response {
    let id = match parse_card_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.cards.delete_card(id, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

#[derive(Deserialize)]
pub struct LinkBody {
    pub target_id: String,
    pub kind: String,
}

/// `POST /api/cards/:source_id/links`
pub async fn link_cards(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(source_id): Path<String>,
    Json(body): Json<LinkBody>,
) -> Response {
    let source_id = match parse_card_id(&source_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let target_id = match parse_card_id(&body.target_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let kind = match parse_link_kind(&body.kind) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    match state.cards.link_cards(source_id, target_id, kind, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `DELETE /api/cards/:source_id/links`
pub async fn unlink_cards(
    state: State<AppState>,
    Identity(identity): Identity,
    Path(source_id): Path<String>,
    Json(body): Json<LinkBody>,
) -> Response {
    let source_id = match parse_card_id(&source_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let target_id = match parse_card_id(&body.target_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let kind = match parse_link_kind(&body.kind) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    match state.cards.unlink_cards(source_id, target_id, kind, &identity).await {
        Ok(()) => Json(serde_json::json!({ "ok": true })).into_response(),
        Err(err) => app_error_response(err),
    }
}

/// `GET /api/boards/:board_id/cards/quota`
pub async fn check_card_quota(state: State<AppState>, Identity(identity): Identity, Path(board_id): Path<String>) -> Response {
    let board_id = match parse_board_id(&board_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.cards.check_card_quota(board_id, &identity).await {
        Ok(quota) => Json(serde_json::json!({
            "current": quota.current,
            "limit": quota.limit,
            "can_create": quota.can_create,
            "limit_enabled": quota.limit_enabled,
        }))
        .into_response(),
        Err(err) => app_error_response(err),
    }
}
