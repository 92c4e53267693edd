//! MongoDB `CardStore` production adapter.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use crate::domain::{BoardId, Card, CardId, IdentityHash};
use crate::error::{StoreError, StoreResult};
use crate::ports::store::{CardStore, UpdateOutcome};

use super::CARDS_COLLECTION;

pub struct MongoCardStore {
    collection: Collection<Card>,
}

impl MongoCardStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection(CARDS_COLLECTION) }
    }
}

fn outcome(matched: u64) -> UpdateOutcome {
    if matched > 0 { UpdateOutcome::Applied } else { UpdateOutcome::NotMatched }
}

#[async_trait]
impl CardStore for MongoCardStore {
    async fn insert(&self, card: &Card) -> StoreResult<()> {
        self.collection.insert_one(card).await.map_err(StoreError::from)?;
        Ok(())
    }

    async fn find_by_id(&self, id: CardId) -> StoreResult<Option<Card>> {
        Ok(self.collection.find_one(doc! { "id": id.inner() }).await.map_err(StoreError::from)?)
    }

    async fn list_by_board(&self, board_id: BoardId) -> StoreResult<Vec<Card>> {
        let cursor = self.collection.find(doc! { "board_id": board_id.inner() }).await.map_err(StoreError::from)?;
        Ok(cursor.try_collect().await.map_err(StoreError::from)?)
    }

    async fn find_children(&self, parent_id: CardId) -> StoreResult<Vec<Card>> {
        let cursor = self
            .collection
            .find(doc! { "parent_id": parent_id.inner() })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(StoreError::from)?;
        Ok(cursor.try_collect().await.map_err(StoreError::from)?)
    }

    async fn find_many(&self, ids: &[CardId]) -> StoreResult<Vec<Card>> {
        let oids: Vec<_> = ids.iter().map(CardId::inner).collect();
        let cursor = self.collection.find(doc! { "id": { "$in": oids } }).await.map_err(StoreError::from)?;
        Ok(cursor.try_collect().await.map_err(StoreError::from)?)
    }

    async fn count_feedback_by_identity(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<u32> {
        let filter = doc! {
            "board_id": board_id.inner(),
            "card_type": "feedback",
            "created_by_hash": identity.as_str(),
        };
        let count = self.collection.count_documents(filter).await.map_err(StoreError::from)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn update_content(&self, id: CardId, content: &str) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection
            .update_one(doc! { "id": id.inner() }, doc! { "$set": { "content": content } })
            .await
            .map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn update_column(&self, id: CardId, column_id: &str) -> StoreResult<UpdateOutcome> {
        let result = self
            .collection
            .update_one(doc! { "id": id.inner() }, doc! { "$set": { "column_id": column_id } })
            .await
            .map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn set_parent(&self, id: CardId, parent_id: Option<CardId>) -> StoreResult<UpdateOutcome> {
        let update = match parent_id {
            Some(parent) => doc! { "$set": { "parent_id": parent.inner() } },
            None => doc! { "$unset": { "parent_id": "" } },
        };
        let result = self.collection.update_one(doc! { "id": id.inner() }, update).await.map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn add_linked_feedback(&self, source_id: CardId, target_id: CardId) -> StoreResult<UpdateOutcome> {
        let filter = doc! { "id": source_id.inner() };
        let update = doc! { "$addToSet": { "linked_feedback_ids": target_id.inner() } };
        let result = self.collection.update_one(filter, update).await.map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn remove_linked_feedback(&self, source_id: CardId, target_id: CardId) -> StoreResult<UpdateOutcome> {
        let filter = doc! { "id": source_id.inner() };
        let update = doc! { "$pull": { "linked_feedback_ids": target_id.inner() } };
        let result = self.collection.update_one(filter, update).await.map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn adjust_direct_count(&self, id: CardId, delta: i64) -> StoreResult<UpdateOutcome> {
        self.clamped_adjust(id, "direct_count", delta).await
    }

    async fn adjust_aggregated_count(&self, id: CardId, delta: i64) -> StoreResult<UpdateOutcome> {
        self.clamped_adjust(id, "aggregated_count", delta).await
    }

    async fn orphan_children(&self, parent_id: CardId) -> StoreResult<u64> {
        let result = self
            .collection
            .update_many(doc! { "parent_id": parent_id.inner() }, doc! { "$unset": { "parent_id": "" } })
            .await
            .map_err(StoreError::from)?;
        Ok(result.modified_count)
    }

    async fn delete(&self, id: CardId) -> StoreResult<u64> {
        let result = self.collection.delete_many(doc! { "id": id.inner() }).await.map_err(StoreError::from)?;
        Ok(result.deleted_count)
    }

    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64> {
        let result = self.collection.delete_many(doc! { "board_id": board_id.inner() }).await.map_err(StoreError::from)?;
        Ok(result.deleted_count)
    }
}

impl MongoCardStore {
    /// `$inc` would happily drive the counter negative, so the clamp-at-zero
    /// guarantee is enforced with a read-modify-write rather than a single
    /// atomic increment. Counters are service-internal bookkeeping, not a
    /// contended hot path, so the extra round trip is an acceptable trade.
    async fn clamped_adjust(&self, id: CardId, field: &str, delta: i64) -> StoreResult<UpdateOutcome> {
        let Some(card) = self.find_by_id(id).await? else {
            return Ok(UpdateOutcome::NotMatched);
        };
        let current = if field == "direct_count" { card.direct_count } else { card.aggregated_count };
        let next = u32::try_from((i64::from(current) + delta).max(0)).unwrap_or(u32::MAX);
        let result = self
            .collection
            .update_one(doc! { "id": id.inner() }, doc! { "$set": { field: next } })
            .await
            .map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }
}
