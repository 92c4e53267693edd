//! Router assembly.

pub mod admin;
pub mod boards;
pub mod cards;
pub mod error;
pub mod identity;
pub mod presence;
pub mod reactions;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/boards", post(boards::create_board))
        .route("/api/boards/by-link/{link}", get(boards::get_board_by_link))
        .route(
            "/api/boards/{id}",
            get(boards::get_board).patch(boards::rename_board).delete(boards::delete_board),
        )
        .route("/api/boards/{id}/columns/{column_id}", patch(boards::rename_column))
        .route("/api/boards/{id}/close", post(boards::close_board))
        .route("/api/boards/{id}/admins", post(boards::add_admin))
        .route("/api/boards/{board_id}/cards", get(cards::list_cards).post(cards::create_card))
        .route("/api/boards/{board_id}/cards/quota", get(cards::check_card_quota))
        .route(
            "/api/cards/{id}",
            get(cards::get_card).patch(cards::update_card).delete(cards::delete_card),
        )
        .route("/api/cards/{id}/move", post(cards::move_card))
        .route("/api/cards/{source_id}/links", post(cards::link_cards).delete(cards::unlink_cards))
        .route(
            "/api/cards/{card_id}/reactions",
            post(reactions::add_reaction).delete(reactions::remove_reaction),
        )
        .route("/api/boards/{board_id}/reactions/quota", get(reactions::check_reaction_quota))
        .route(
            "/api/boards/{board_id}/presence",
            get(presence::active_users).post(presence::join).patch(presence::update_alias),
        )
        .route("/api/boards/{board_id}/presence/heartbeat", post(presence::heartbeat))
        .route("/api/admin/boards/{id}/clear", post(admin::clear_board_data))
        .route("/api/admin/boards/{id}/reset", post(admin::reset_board))
        .route("/api/admin/boards/seed", post(admin::seed_board))
        .route("/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn(identity::identity_cookie_layer))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
