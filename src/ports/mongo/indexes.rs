//! Startup unique-index creation (§6 "Persisted state layout").
//!
//! Three uniqueness invariants are enforced by the database rather than by
//! application-level locking: a board's `shareable_link` (invariant 8), one
//! reaction per `(card_id, identity_hash)` (invariant 4), and one session per
//! `(board_id, identity_hash)`.

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

use super::{BOARDS_COLLECTION, CARDS_COLLECTION, REACTIONS_COLLECTION, SESSIONS_COLLECTION};

/// Creates (or confirms) every index this adapter relies on. Idempotent —
/// safe to call on every process start.
pub async fn ensure_indexes(db: &Database) -> mongodb::error::Result<()> {
    let unique = IndexOptions::builder().unique(true).build();

    db.collection::<mongodb::bson::Document>(BOARDS_COLLECTION)
        .create_index(IndexModel::builder().keys(doc! { "shareable_link": 1 }).options(unique.clone()).build())
        .await?;
    db.collection::<mongodb::bson::Document>(BOARDS_COLLECTION)
        .create_index(IndexModel::builder().keys(doc! { "id": 1 }).options(unique.clone()).build())
        .await?;

    db.collection::<mongodb::bson::Document>(CARDS_COLLECTION)
        .create_index(IndexModel::builder().keys(doc! { "id": 1 }).options(unique.clone()).build())
        .await?;
    db.collection::<mongodb::bson::Document>(CARDS_COLLECTION)
        .create_index(IndexModel::builder().keys(doc! { "board_id": 1 }).build())
        .await?;

    db.collection::<mongodb::bson::Document>(REACTIONS_COLLECTION)
        .create_index(
            IndexModel::builder().keys(doc! { "card_id": 1, "identity_hash": 1 }).options(unique.clone()).build(),
        )
        .await?;

    db.collection::<mongodb::bson::Document>(SESSIONS_COLLECTION)
        .create_index(IndexModel::builder().keys(doc! { "board_id": 1, "identity_hash": 1 }).options(unique).build())
        .await?;

    Ok(())
}
