//! MongoDB `ReactionStore` production adapter.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};

use crate::domain::{BoardId, CardId, IdentityHash, Reaction, ReactionId, ReactionKind, Timestamp};
use crate::error::{StoreError, StoreResult};
use crate::ports::store::ReactionStore;

use super::{CARDS_COLLECTION, REACTIONS_COLLECTION};

pub struct MongoReactionStore {
    collection: Collection<Reaction>,
    db: Database,
}

impl MongoReactionStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection(REACTIONS_COLLECTION), db: db.clone() }
    }
}

#[async_trait]
impl ReactionStore for MongoReactionStore {
    async fn find_one(&self, card_id: CardId, identity: &IdentityHash) -> StoreResult<Option<Reaction>> {
        let filter = doc! { "card_id": card_id.inner(), "identity_hash": identity.as_str() };
        Ok(self.collection.find_one(filter).await.map_err(StoreError::from)?)
    }

    async fn upsert(
        &self,
        card_id: CardId,
        identity: &IdentityHash,
        alias: &str,
        kind: &ReactionKind,
        now: Timestamp,
    ) -> StoreResult<(Reaction, bool)> {
        // `id` is client-generated and only ever written via `$setOnInsert`,
        // so comparing the returned document's `id` to the candidate tells
        // us whether this call inserted or updated, atomically and in one
        // round trip (no separate read-then-write).
        let candidate = ReactionId::new();
        let filter = doc! { "card_id": card_id.inner(), "identity_hash": identity.as_str() };
        let update = doc! {
            "$set": { "alias": alias, "kind": kind.as_str(), "created_at": now },
            "$setOnInsert": { "id": candidate.inner(), "card_id": card_id.inner(), "identity_hash": identity.as_str() },
        };
        let options = FindOneAndUpdateOptions::builder().upsert(true).return_document(ReturnDocument::After).build();
        let reaction = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await
            .map_err(StoreError::from)?
            .expect("upsert with return_document(After) always yields a document");
        let was_insert = reaction.id == candidate;
        Ok((reaction, was_insert))
    }

    async fn delete_one(&self, card_id: CardId, identity: &IdentityHash) -> StoreResult<bool> {
        let filter = doc! { "card_id": card_id.inner(), "identity_hash": identity.as_str() };
        let result = self.collection.delete_many(filter).await.map_err(StoreError::from)?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_by_card(&self, card_id: CardId) -> StoreResult<u64> {
        let result = self.collection.delete_many(doc! { "card_id": card_id.inner() }).await.map_err(StoreError::from)?;
        Ok(result.deleted_count)
    }

    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64> {
        let card_ids = self.card_ids_for_board(board_id).await?;
        if card_ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .delete_many(doc! { "card_id": { "$in": card_ids } })
            .await
            .map_err(StoreError::from)?;
        Ok(result.deleted_count)
    }

    async fn count_by_card(&self, card_id: CardId) -> StoreResult<u32> {
        let count = self.collection.count_documents(doc! { "card_id": card_id.inner() }).await.map_err(StoreError::from)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn count_by_board_and_identity(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<u32> {
        let card_ids = self.card_ids_for_board(board_id).await?;
        if card_ids.is_empty() {
            return Ok(0);
        }
        let filter = doc! { "card_id": { "$in": card_ids }, "identity_hash": identity.as_str() };
        let count = self.collection.count_documents(filter).await.map_err(StoreError::from)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

impl MongoReactionStore {
    /// Reactions are keyed by card, not board; `count_by_board_and_identity`
    /// and `delete_by_board` need the `reactions ⋈ cards` join that a single
    /// collection doesn't give for free, so this resolves the board's card
    /// ids first and then filters reactions by that set.
    async fn card_ids_for_board(&self, board_id: BoardId) -> StoreResult<Vec<mongodb::bson::oid::ObjectId>> {
        let cards: Collection<mongodb::bson::Document> = self.db.collection(CARDS_COLLECTION);
        let mut cursor = cards
            .find(doc! { "board_id": board_id.inner() })
            .projection(doc! { "id": 1 })
            .await
            .map_err(StoreError::from)?;
        let mut ids = Vec::new();
        while let Some(doc) = cursor.try_next().await.map_err(StoreError::from)? {
            if let Ok(id) = doc.get_object_id("id") {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
