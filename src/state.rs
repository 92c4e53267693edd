//! Shared application state, injected into Axum handlers via the `State`
//! extractor (§6 "Shared resources").

use std::sync::Arc;

use crate::admin::AdminChannel;
use crate::ports::identity::IdentitySource;
use crate::ports::Clock;
use crate::realtime::Gateway;
use crate::services::{BoardService, CardService, PresenceService, ReactionService};

/// All services hold their own store/clock/broadcaster handles; `AppState`
/// is just the set of entry points a route handler needs, each Arc-wrapped
/// so cloning the state per-request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<BoardService>,
    pub cards: Arc<CardService>,
    pub reactions: Arc<ReactionService>,
    pub presence: Arc<PresenceService>,
    pub gateway: Arc<Gateway>,
    pub identity: Arc<dyn IdentitySource>,
    pub admin: Arc<AdminChannel>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        boards: Arc<BoardService>,
        cards: Arc<CardService>,
        reactions: Arc<ReactionService>,
        presence: Arc<PresenceService>,
        gateway: Arc<Gateway>,
        identity: Arc<dyn IdentitySource>,
        admin: Arc<AdminChannel>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { boards, cards, reactions, presence, gateway, identity, admin, clock }
    }
}
