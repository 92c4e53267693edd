//! MongoDB `BoardStore` production adapter.

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use crate::domain::{Board, BoardId, IdentityHash, ShareableLink, Timestamp};
use crate::error::{StoreError, StoreResult};
use crate::ports::store::{BoardStore, UpdateOutcome};

use super::BOARDS_COLLECTION;

pub struct MongoBoardStore {
    collection: Collection<Board>,
}

impl MongoBoardStore {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self { collection: db.collection(BOARDS_COLLECTION) }
    }
}

fn outcome(matched: u64) -> UpdateOutcome {
    if matched > 0 { UpdateOutcome::Applied } else { UpdateOutcome::NotMatched }
}

#[async_trait]
impl BoardStore for MongoBoardStore {
    async fn insert(&self, board: &Board) -> StoreResult<()> {
        self.collection.insert_one(board).await.map_err(StoreError::from)?;
        Ok(())
    }

    async fn find_by_id(&self, id: BoardId) -> StoreResult<Option<Board>> {
        Ok(self.collection.find_one(doc! { "id": id.inner() }).await.map_err(StoreError::from)?)
    }

    async fn find_by_shareable_link(&self, link: &ShareableLink) -> StoreResult<Option<Board>> {
        Ok(self
            .collection
            .find_one(doc! { "shareable_link": link.as_str() })
            .await
            .map_err(StoreError::from)?)
    }

    async fn rename(&self, id: BoardId, new_name: &str, identity: &IdentityHash) -> StoreResult<UpdateOutcome> {
        let filter = doc! {
            "id": id.inner(),
            "state": "active",
            "admins": identity.as_str(),
        };
        let update = doc! { "$set": { "name": new_name } };
        let result = self.collection.update_one(filter, update).await.map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn rename_column(
        &self,
        id: BoardId,
        column_id: &str,
        new_name: &str,
        identity: &IdentityHash,
    ) -> StoreResult<UpdateOutcome> {
        let filter = doc! {
            "id": id.inner(),
            "state": "active",
            "admins": identity.as_str(),
            "columns.id": column_id,
        };
        let update = doc! { "$set": { "columns.$.name": new_name } };
        let result = self.collection.update_one(filter, update).await.map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn close(&self, id: BoardId, identity: &IdentityHash, closed_at: Timestamp) -> StoreResult<UpdateOutcome> {
        let admin_filter = doc! { "id": id.inner(), "admins": identity.as_str() };
        let transition = doc! {
            "id": id.inner(),
            "admins": identity.as_str(),
            "state": "active",
        };
        let update = doc! { "$set": { "state": "closed", "closed_at": closed_at } };
        let result = self.collection.update_one(transition, update).await.map_err(StoreError::from)?;
        if result.matched_count > 0 {
            return Ok(UpdateOutcome::Applied);
        }
        // Already closed (or not an admin, or board missing) — re-check
        // admin membership alone so closing twice stays idempotent without
        // disturbing the original `closed_at`.
        let still_admin = self.collection.count_documents(admin_filter).await.map_err(StoreError::from)?;
        Ok(outcome(still_admin))
    }

    async fn add_admin(&self, id: BoardId, identity: &IdentityHash, target: &IdentityHash) -> StoreResult<UpdateOutcome> {
        let filter = doc! { "id": id.inner(), "admins.0": identity.as_str() };
        let update = doc! { "$addToSet": { "admins": target.as_str() } };
        let result = self.collection.update_one(filter, update).await.map_err(StoreError::from)?;
        Ok(outcome(result.matched_count))
    }

    async fn delete(&self, id: BoardId) -> StoreResult<u64> {
        let result = self.collection.delete_many(doc! { "id": id.inner() }).await.map_err(StoreError::from)?;
        Ok(result.deleted_count)
    }
}
