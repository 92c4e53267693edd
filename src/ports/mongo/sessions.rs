//! MongoDB `SessionStore` production adapter.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};

use crate::domain::{BoardId, IdentityHash, Session, Timestamp};
use crate::error::{StoreError, StoreResult};
use crate::ports::store::SessionStore;

use super::SESSIONS_COLLECTION;

pub struct MongoSessionStore {
    collection: Collection<Session>,
}

impl MongoSessionStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection(SESSIONS_COLLECTION) }
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn upsert(&self, board_id: BoardId, identity: &IdentityHash, alias: &str, now: Timestamp) -> StoreResult<Session> {
        let filter = doc! { "board_id": board_id.inner(), "identity_hash": identity.as_str() };
        let update = doc! {
            "$set": { "alias": alias, "last_active": now },
            "$setOnInsert": { "board_id": board_id.inner(), "identity_hash": identity.as_str(), "created_at": now },
        };
        let options = FindOneAndUpdateOptions::builder().upsert(true).return_document(ReturnDocument::After).build();
        Ok(self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await
            .map_err(StoreError::from)?
            .expect("upsert with return_document(After) always yields a document"))
    }

    async fn heartbeat(&self, board_id: BoardId, identity: &IdentityHash, now: Timestamp) -> StoreResult<bool> {
        let filter = doc! { "board_id": board_id.inner(), "identity_hash": identity.as_str() };
        let update = doc! { "$set": { "last_active": now } };
        let result = self.collection.update_one(filter, update).await.map_err(StoreError::from)?;
        Ok(result.matched_count > 0)
    }

    async fn find(&self, board_id: BoardId, identity: &IdentityHash) -> StoreResult<Option<Session>> {
        let filter = doc! { "board_id": board_id.inner(), "identity_hash": identity.as_str() };
        Ok(self.collection.find_one(filter).await.map_err(StoreError::from)?)
    }

    async fn active_sessions(&self, board_id: BoardId, now: Timestamp, window_millis: i64) -> StoreResult<Vec<Session>> {
        let cutoff = now - window_millis;
        let filter = doc! { "board_id": board_id.inner(), "last_active": { "$gte": cutoff } };
        let cursor = self.collection.find(filter).await.map_err(StoreError::from)?;
        Ok(cursor.try_collect().await.map_err(StoreError::from)?)
    }

    async fn delete_by_board(&self, board_id: BoardId) -> StoreResult<u64> {
        let result = self.collection.delete_many(doc! { "board_id": board_id.inner() }).await.map_err(StoreError::from)?;
        Ok(result.deleted_count)
    }
}
