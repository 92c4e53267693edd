//! Event Broadcaster (component K) — "one method per event" (§4.5).
//!
//! Services depend on `Arc<dyn Broadcaster>`, never on the gateway
//! directly, so unit tests can swap in [`NoopBroadcaster`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::BoardId;
use crate::ports::Clock;

use super::events::{
    BoardClosed, BoardDeleted, BoardRenamed, CardCreated, CardDeleted, CardLinked, CardMoved, CardUnlinked,
    CardUpdated, ColumnRenamed, Event, ReactionAdded, ReactionRemoved, UserAliasChanged, UserJoined,
};
use super::gateway::Gateway;

#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn board_renamed(&self, board_id: BoardId, payload: BoardRenamed);
    async fn column_renamed(&self, board_id: BoardId, payload: ColumnRenamed);
    async fn board_closed(&self, board_id: BoardId, payload: BoardClosed);
    async fn board_deleted(&self, board_id: BoardId, payload: BoardDeleted);
    async fn user_joined(&self, board_id: BoardId, payload: UserJoined);
    async fn user_alias_changed(&self, board_id: BoardId, payload: UserAliasChanged);
    async fn card_created(&self, board_id: BoardId, payload: CardCreated);
    async fn card_updated(&self, board_id: BoardId, payload: CardUpdated);
    async fn card_deleted(&self, board_id: BoardId, payload: CardDeleted);
    async fn card_moved(&self, board_id: BoardId, payload: CardMoved);
    async fn card_linked(&self, board_id: BoardId, payload: CardLinked);
    async fn card_unlinked(&self, board_id: BoardId, payload: CardUnlinked);
    async fn reaction_added(&self, board_id: BoardId, payload: ReactionAdded);
    async fn reaction_removed(&self, board_id: BoardId, payload: ReactionRemoved);
}

/// Used by services in unit tests so assertions focus on store state, not
/// fan-out (§4.5 "A no-op implementation is used in unit tests").
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBroadcaster;

#[async_trait]
impl Broadcaster for NoopBroadcaster {
    async fn board_renamed(&self, _board_id: BoardId, _payload: BoardRenamed) {}
    async fn column_renamed(&self, _board_id: BoardId, _payload: ColumnRenamed) {}
    async fn board_closed(&self, _board_id: BoardId, _payload: BoardClosed) {}
    async fn board_deleted(&self, _board_id: BoardId, _payload: BoardDeleted) {}
    async fn user_joined(&self, _board_id: BoardId, _payload: UserJoined) {}
    async fn user_alias_changed(&self, _board_id: BoardId, _payload: UserAliasChanged) {}
    async fn card_created(&self, _board_id: BoardId, _payload: CardCreated) {}
    async fn card_updated(&self, _board_id: BoardId, _payload: CardUpdated) {}
    async fn card_deleted(&self, _board_id: BoardId, _payload: CardDeleted) {}
    async fn card_moved(&self, _board_id: BoardId, _payload: CardMoved) {}
    async fn card_linked(&self, _board_id: BoardId, _payload: CardLinked) {}
    async fn card_unlinked(&self, _board_id: BoardId, _payload: CardUnlinked) {}
    async fn reaction_added(&self, _board_id: BoardId, _payload: ReactionAdded) {}
    async fn reaction_removed(&self, _board_id: BoardId, _payload: ReactionRemoved) {}
}

/// Production broadcaster: wraps each typed payload in its [`Event`] and
/// hands it to the in-process [`Gateway`] for room fan-out.
pub struct GatewayBroadcaster {
    gateway: Arc<Gateway>,
    clock: Arc<dyn Clock>,
}

impl GatewayBroadcaster {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>, clock: Arc<dyn Clock>) -> Self {
        Self { gateway, clock }
    }

    async fn emit(&self, board_id: BoardId, event: Event) {
        self.gateway.broadcast(board_id, event, self.clock.as_ref()).await;
    }
}

#[async_trait]
impl Broadcaster for GatewayBroadcaster {
    async fn board_renamed(&self, board_id: BoardId, payload: BoardRenamed) {
        self.emit(board_id, Event::BoardRenamed(payload)).await;
    }

    async fn column_renamed(&self, board_id: BoardId, payload: ColumnRenamed) {
        self.emit(board_id, Event::ColumnRenamed(payload)).await;
    }

    async fn board_closed(&self, board_id: BoardId, payload: BoardClosed) {
        self.emit(board_id, Event::BoardClosed(payload)).await;
    }

    async fn board_deleted(&self, board_id: BoardId, payload: BoardDeleted) {
        self.emit(board_id, Event::BoardDeleted(payload)).await;
    }

    async fn user_joined(&self, board_id: BoardId, payload: UserJoined) {
        self.emit(board_id, Event::UserJoined(payload)).await;
    }

    async fn user_alias_changed(&self, board_id: BoardId, payload: UserAliasChanged) {
        self.emit(board_id, Event::UserAliasChanged(payload)).await;
    }

    async fn card_created(&self, board_id: BoardId, payload: CardCreated) {
        self.emit(board_id, Event::CardCreated(payload)).await;
    }

    async fn card_updated(&self, board_id: BoardId, payload: CardUpdated) {
        self.emit(board_id, Event::CardUpdated(payload)).await;
    }

    async fn card_deleted(&self, board_id: BoardId, payload: CardDeleted) {
        self.emit(board_id, Event::CardDeleted(payload)).await;
    }

    async fn card_moved(&self, board_id: BoardId, payload: CardMoved) {
        self.emit(board_id, Event::CardMoved(payload)).await;
    }

    async fn card_linked(&self, board_id: BoardId, payload: CardLinked) {
        self.emit(board_id, Event::CardLinked(payload)).await;
    }

    async fn card_unlinked(&self, board_id: BoardId, payload: CardUnlinked) {
        self.emit(board_id, Event::CardUnlinked(payload)).await;
    }

    async fn reaction_added(&self, board_id: BoardId, payload: ReactionAdded) {
        self.emit(board_id, Event::ReactionAdded(payload)).await;
    }

    async fn reaction_removed(&self, board_id: BoardId, payload: ReactionRemoved) {
        self.emit(board_id, Event::ReactionRemoved(payload)).await;
    }
}
