//! In-memory `CardStore` test adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{BoardId, Card, CardId, IdentityHash};
use crate::error::StoreResult;
use crate::ports::store::{CardStore, UpdateOutcome};

#[derive(Default)]
pub struct MemoryCardStore {
    cards: Mutex<HashMap<CardId, Card>>,
}

impl MemoryCardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn clamp_add(current: u32, delta: i64) -> u32 {
    let signed = i64::from(current) + delta;
    u32::try_from(signed.max(0)).unwrap_or(u32::MAX)
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn insert(&self, card: &Card) -> StoreResult<()> {
        self.cards.lock().unwrap().insert(card.id, card.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CardId) -> StoreResult<Option<Card>> {
        Ok(self.cards.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_board(&self, board_id: BoardId) -> StoreResult<Vec<Card>> {
        Ok(self.cards.lock().unwrap().values().filter(|c| c.board_id == board_id).cloned().collect())
    }

    async fn find_children(&self, parent_id: CardId) -> StoreResult<Vec<Card>> {
        let mut children: Vec<Card> =
            self.cards.lock().unwrap().values().filter(|c| c.parent_id == Some(parent_id)).cloned().collect();
        children.sort_by_key(|c| c.created_at);
        Ok(children)
    }

    async fn find_many(&self, ids: &[CardId]) -> StoreResult<Vec<Card>> {
        let cards = self.cards.lock().unwrap();
        Ok(ids.iter().filter_map(|id| cards.get(id).cloned()).collect())
    }

    async fn count_feedback_by_identity(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<u32> {
        let count = self
            .cards
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.board_id == board_id && c.is_feedback() && &c.created_by_hash == identity)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn update_content(&self, id: CardId, content: &str) -> StoreResult<UpdateOutcome> {
        let mut cards = self.cards.lock().unwrap();
        let Some(card) = cards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        card.content = content.to_string();
        Ok(UpdateOutcome::Applied)
    }

    async fn update_column(&self, id: CardId, column_id: &str) -> StoreResult<UpdateOutcome> {
        let mut cards = self.cards.lock().unwrap();
        let Some(card) = cards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        card.column_id = column_id.to_string();
        Ok(UpdateOutcome::Applied)
    }

    async fn set_parent(&self, id: CardId, parent_id: Option<CardId>) -> StoreResult<UpdateOutcome> {
        let mut cards = self.cards.lock().unwrap();
        let Some(card) = cards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        card.parent_id = parent_id;
        Ok(UpdateOutcome::Applied)
    }

    async fn add_linked_feedback(&self, source_id: CardId, target_id: CardId) -> StoreResult<UpdateOutcome> {
        let mut cards = self.cards.lock().unwrap();
        let Some(card) = cards.get_mut(&source_id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        if !card.linked_feedback_ids.contains(&target_id) {
            card.linked_feedback_ids.push(target_id);
        }
        Ok(UpdateOutcome::Applied)
    }

    async fn remove_linked_feedback(&self, source_id: CardId, target_id: CardId) -> StoreResult<UpdateOutcome> {
        let mut cards = self.cards.lock().unwrap();
        let Some(card) = cards.get_mut(&source_id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        card.linked_feedback_ids.retain(|id| id != &target_id);
        Ok(UpdateOutcome::Applied)
    }

    async fn adjust_direct_count(&self, id: CardId, delta: i64) -> StoreResult<UpdateOutcome> {
        let mut cards = self.cards.lock().unwrap();
        let Some(card) = cards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        card.direct_count = clamp_add(card.direct_count, delta);
        Ok(UpdateOutcome::Applied)
    }

    async fn adjust_aggregated_count(&self, id: CardId, delta: i64) -> StoreResult<UpdateOutcome> {
        let mut cards = self.cards.lock().unwrap();
        let Some(card) = cards.get_mut(&id) else {
            return Ok(UpdateOutcome::NotMatched);
        };
        card.aggregated_count = clamp_add(card.aggregated_count, delta);
        Ok(UpdateOutcome::Applied)
    }

    async fn orphan_children(&self, parent_id: CardId) -> StoreResult<u64> {
        let mut cards = self.cards.lock().unwrap();
        let mut count = 0u64;
        for card in cards.values_mut() {
            if card.parent_id == Some(parent_id) {
                card.parent_id = None;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete(&self, id: CardId) -> StoreResult<u64> {
        Ok(u64::from(self.cards.lock().unwrap().remove(&id).is_some()))
    }

    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64> {
        let mut cards = self.cards.lock().unwrap();
        let before = cards.len();
        cards.retain(|_, c| c.board_id != board_id);
        Ok(u64::try_from(before - cards.len()).unwrap_or(0))
    }
}
