//! Persistence port (component A) — one narrow trait per store, each
//! exposing exactly the primitive operations §6 requires for that store's
//! atomic conditional updates: `InsertOne`, `FindOne`, `UpdateOneConditional`,
//! `DeleteMany`, `CountDocuments`, and (reactions only) `FindOneAndUpdate`
//! for upsert-with-isness.

use async_trait::async_trait;

use crate::domain::{Board, BoardId, Card, CardId, IdentityHash, Reaction, ReactionKind, Session, ShareableLink, Timestamp};
use crate::error::StoreResult;

/// Outcome of an atomic conditional update. `NotMatched` means the filter
/// (id + precondition, e.g. `state=active`) matched zero documents; the
/// service re-reads to classify not-found vs. forbidden vs. closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    NotMatched,
}

impl UpdateOutcome {
    #[must_use]
    pub fn matched(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn insert(&self, board: &Board) -> StoreResult<()>;
    async fn find_by_id(&self, id: BoardId) -> StoreResult<Option<Board>>;
    async fn find_by_shareable_link(&self, link: &ShareableLink) -> StoreResult<Option<Board>>;

    /// Conditioned on `{id, state=active, admins ∋ identity}`.
    async fn rename(&self, id: BoardId, new_name: &str, identity: &IdentityHash) -> StoreResult<UpdateOutcome>;

    /// Conditioned on `{id, state=active, admins ∋ identity}`, targeting one
    /// embedded column by id.
    async fn rename_column(
        &self,
        id: BoardId,
        column_id: &str,
        new_name: &str,
        identity: &IdentityHash,
    ) -> StoreResult<UpdateOutcome>;

    /// Conditioned on admin membership. Idempotent: closing an
    /// already-closed board is `Applied`, not `NotMatched`.
    async fn close(&self, id: BoardId, identity: &IdentityHash, closed_at: Timestamp) -> StoreResult<UpdateOutcome>;

    /// Conditioned on `admins[0] = identity` (creator only). Set-like append.
    async fn add_admin(&self, id: BoardId, identity: &IdentityHash, target: &IdentityHash) -> StoreResult<UpdateOutcome>;

    async fn delete(&self, id: BoardId) -> StoreResult<u64>;
}

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn insert(&self, card: &Card) -> StoreResult<()>;
    async fn find_by_id(&self, id: CardId) -> StoreResult<Option<Card>>;
    async fn list_by_board(&self, board_id: BoardId) -> StoreResult<Vec<Card>>;
    async fn find_children(&self, parent_id: CardId) -> StoreResult<Vec<Card>>;
    async fn find_many(&self, ids: &[CardId]) -> StoreResult<Vec<Card>>;

    async fn count_feedback_by_identity(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<u32>;

    /// Creator-only at the service layer; conditioned here on id only
    /// (the service has already authorized and checked closed-board state).
    async fn update_content(&self, id: CardId, content: &str) -> StoreResult<UpdateOutcome>;
    async fn update_column(&self, id: CardId, column_id: &str) -> StoreResult<UpdateOutcome>;
    async fn set_parent(&self, id: CardId, parent_id: Option<CardId>) -> StoreResult<UpdateOutcome>;
    async fn add_linked_feedback(&self, source_id: CardId, target_id: CardId) -> StoreResult<UpdateOutcome>;
    async fn remove_linked_feedback(&self, source_id: CardId, target_id: CardId) -> StoreResult<UpdateOutcome>;

    /// Signed delta; store clamps the result at zero.
    async fn adjust_direct_count(&self, id: CardId, delta: i64) -> StoreResult<UpdateOutcome>;
    /// Signed delta; store clamps the result at zero.
    async fn adjust_aggregated_count(&self, id: CardId, delta: i64) -> StoreResult<UpdateOutcome>;

    async fn orphan_children(&self, parent_id: CardId) -> StoreResult<u64>;
    async fn delete(&self, id: CardId) -> StoreResult<u64>;
    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64>;
}

#[async_trait]
pub trait ReactionStore: Send + Sync {
    async fn find_one(&self, card_id: CardId, identity: &IdentityHash) -> StoreResult<Option<Reaction>>;

    /// Upsert-with-isness: inserts if absent, updates `kind`/`created_at` if
    /// present, and tells the caller which happened.
    async fn upsert(
        &self,
        card_id: CardId,
        identity: &IdentityHash,
        alias: &str,
        kind: &ReactionKind,
        now: Timestamp,
    ) -> StoreResult<(Reaction, bool)>;

    async fn delete_one(&self, card_id: CardId, identity: &IdentityHash) -> StoreResult<bool>;
    async fn delete_by_card(&self, card_id: CardId) -> StoreResult<u64>;
    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64>;

    async fn count_by_card(&self, card_id: CardId) -> StoreResult<u32>;

    /// Multi-key join over `reactions ⋈ cards`, scoped to one board.
    async fn count_by_board_and_identity(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<u32>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Upserts `(board_id, identity)`, refreshing alias and `last_active`.
    async fn upsert(&self, board_id: BoardId, identity: &IdentityHash, alias: &str, now: Timestamp) -> StoreResult<Session>;

    /// No-op (returns `false`) if no session exists yet.
    async fn heartbeat(&self, board_id: BoardId, identity: &IdentityHash, now: Timestamp) -> StoreResult<bool>;

    async fn find(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<Option<Session>>;

    /// Sessions where `now - last_active <= window`.
    async fn active_sessions(&self, board_id: BoardId, now: Timestamp, window_millis: i64) -> StoreResult<Vec<Session>>;

    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64>;
}
