//! In-memory `ReactionStore` test adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{BoardId, CardId, IdentityHash, Reaction, ReactionId, ReactionKind, Timestamp};
use crate::error::StoreResult;
use crate::ports::store::ReactionStore;

#[derive(Default)]
pub struct MemoryReactionStore {
    reactions: Mutex<HashMap<(CardId, IdentityHash), Reaction>>,
    /// card_id -> board_id, populated by tests/services via `register_card`
    /// so the board+identity join used by reaction-quota checks works
    /// without needing a real cross-store query.
    card_boards: Mutex<HashMap<CardId, BoardId>>,
}

impl MemoryReactionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_card(&self, card_id: CardId, board_id: BoardId) {
        self.card_boards.lock().unwrap().insert(card_id, board_id);
    }
}

#[async_trait]
impl ReactionStore for MemoryReactionStore {
    async fn find_one(&self, card_id: CardId, identity: &IdentityHash) -> StoreResult<Option<Reaction>> {
        Ok(self.reactions.lock().unwrap().get(&(card_id, identity.clone())).cloned())
    }

    async fn upsert(
        &self,
        card_id: CardId,
        identity: &IdentityHash,
        alias: &str,
        kind: &ReactionKind,
        now: Timestamp,
    ) -> StoreResult<(Reaction, bool)> {
        let mut reactions = self.reactions.lock().unwrap();
        let key = (card_id, identity.clone());
        if let Some(existing) = reactions.get_mut(&key) {
            existing.kind = kind.clone();
            existing.created_at = now;
            existing.alias = alias.to_string();
            return Ok((existing.clone(), false));
        }
        let reaction = Reaction {
            id: ReactionId::new(),
            card_id,
            identity_hash: identity.clone(),
            alias: alias.to_string(),
            kind: kind.clone(),
            created_at: now,
        };
        reactions.insert(key, reaction.clone());
        Ok((reaction, true))
    }

    async fn delete_one(&self, card_id: CardId, identity: &IdentityHash) -> StoreResult<bool> {
        Ok(self.reactions.lock().unwrap().remove(&(card_id, identity.clone())).is_some())
    }

    async fn delete_by_card(&self, card_id: CardId) -> StoreResult<u64> {
        let mut reactions = self.reactions.lock().unwrap();
        let before = reactions.len();
        reactions.retain(|(c, _), _| *c != card_id);
        Ok(u64::try_from(before - reactions.len()).unwrap_or(0))
    }

    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64> {
        let card_boards = self.card_boards.lock().unwrap();
        let mut reactions = self.reactions.lock().unwrap();
        let before = reactions.len();
        reactions.retain(|(card_id, _), _| card_boards.get(card_id) != Some(&board_id));
        Ok(u64::try_from(before - reactions.len()).unwrap_or(0))
    }

    async fn count_by_card(&self, card_id: CardId) -> StoreResult<u32> {
        let count = self.reactions.lock().unwrap().keys().filter(|(c, _)| *c == card_id).count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn count_by_board_and_identity(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<u32> {
        let card_boards = self.card_boards.lock().unwrap();
        let count = self
            .reactions
            .lock()
            .unwrap()
            .keys()
            .filter(|(card_id, ident)| ident == identity && card_boards.get(card_id) == Some(&board_id))
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
