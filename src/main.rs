mod admin;
mod config;
mod domain;
mod error;
mod ports;
mod realtime;
mod routes;
mod services;
mod state;

use std::sync::Arc;
use std::time::Duration;

use mongodb::Client;

use ports::identity::CookieIdentity;
use ports::mongo::{MongoBoardStore, MongoCardStore, MongoReactionStore, MongoSessionStore};
use ports::{Hasher, Sha256Hasher, SystemClock};
use realtime::{Gateway, GatewayBroadcaster};
use services::{BoardService, CardService, PresenceService, ReactionService};

/// Deadline for in-flight mutations to finish once shutdown begins
/// (§5 "drains in-flight mutations up to a deadline").
const SHUTDOWN_DRAIN_DEADLINE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = config::Config::from_env().expect("invalid configuration");

    let mongo_client = Client::with_uri_str(&config.mongo_url).await.expect("failed to connect to MongoDB");
    let db = mongo_client.database(&config.mongo_db_name);
    ports::mongo::indexes::ensure_indexes(&db).await.expect("failed to ensure indexes");

    let boards_store = Arc::new(MongoBoardStore::new(&db));
    let cards_store = Arc::new(MongoCardStore::new(&db));
    let reactions_store = Arc::new(MongoReactionStore::new(&db));
    let sessions_store = Arc::new(MongoSessionStore::new(&db));

    let clock: Arc<dyn ports::Clock> = Arc::new(SystemClock);
    let gateway = Arc::new(Gateway::new(config.subscriber_send_queue_capacity));
    let broadcaster: Arc<dyn realtime::Broadcaster> = Arc::new(GatewayBroadcaster::new(gateway.clone(), clock.clone()));

    let board_service = Arc::new(BoardService::new(
        boards_store.clone(),
        cards_store.clone(),
        reactions_store.clone(),
        sessions_store.clone(),
        clock.clone(),
        broadcaster.clone(),
        config.shareable_link_length,
        config.shareable_link_retry_count,
        config.presence_window_seconds,
        config.admin_secret.clone(),
    ));
    let card_service = Arc::new(CardService::new(
        boards_store.clone(),
        cards_store.clone(),
        reactions_store.clone(),
        clock.clone(),
        broadcaster.clone(),
        config.default_card_limit,
    ));
    let reaction_service = Arc::new(ReactionService::new(
        boards_store.clone(),
        cards_store.clone(),
        reactions_store.clone(),
        clock.clone(),
        broadcaster.clone(),
        config.default_reaction_limit,
    ));
    let presence_service = Arc::new(PresenceService::new(
        boards_store.clone(),
        sessions_store.clone(),
        clock.clone(),
        broadcaster.clone(),
        config.presence_window_seconds,
    ));

    let hasher: Arc<dyn Hasher> = Arc::new(Sha256Hasher);
    let identity_source: Arc<dyn ports::IdentitySource> = Arc::new(CookieIdentity::new(hasher));
    let admin_channel =
        Arc::new(admin::AdminChannel::new(boards_store, cards_store, reactions_store, sessions_store, clock.clone(), config.admin_secret));

    let app_state = state::AppState::new(
        board_service,
        card_service,
        reaction_service,
        presence_service,
        gateway,
        identity_source,
        admin_channel,
        clock,
    );

    let app = routes::app(app_state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await.expect("failed to bind");

    tracing::info!(port = config.port, "retro-pulse listening");
    let serve = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    tokio::select! {
        result = serve => result.expect("server failed"),
        () = drain_deadline() => tracing::warn!("drain deadline exceeded, terminating with requests still in flight"),
    }
}

/// Resolves on Ctrl+C. This is what `with_graceful_shutdown` waits on, so
/// the listener closes and new mutations stop being accepted the moment the
/// signal fires — the drain deadline is enforced separately, by racing the
/// whole `serve` future against [`drain_deadline`].
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to install ctrl_c handler");
    tracing::info!("shutdown signal received, closing listener and draining in-flight requests");
}

/// Bounds how long the drain of in-flight mutations is allowed to take once
/// shutdown begins (§5 "drains in-flight mutations up to a deadline").
/// `tokio::signal::ctrl_c` may be awaited from more than one task; each call
/// resolves independently once the signal fires.
async fn drain_deadline() {
    tokio::signal::ctrl_c().await.expect("failed to install ctrl_c handler");
    tokio::time::sleep(SHUTDOWN_DRAIN_DEADLINE).await;
}
