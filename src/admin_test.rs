use std::sync::Arc;

use super::*;
use crate::domain::Column;
use crate::ports::clock::FixedClock;
use crate::ports::memory::{MemoryBoardStore, MemoryCardStore, MemoryReactionStore, MemorySessionStore};

fn identity(byte: u8) -> crate::domain::IdentityHash {
    crate::domain::IdentityHash::from_hashed(hex::encode([byte; 32]))
}

fn channel(secret: &str) -> AdminChannel {
    AdminChannel::new(
        Arc::new(MemoryBoardStore::new()),
        Arc::new(MemoryCardStore::new()),
        Arc::new(MemoryReactionStore::new()),
        Arc::new(MemorySessionStore::new()),
        Arc::new(FixedClock::new(1_000)),
        secret.to_string(),
    )
}

#[test]
fn verify_secret_accepts_exact_match_only() {
    assert!(verify_secret("correct-horse", "correct-horse"));
    assert!(!verify_secret("correct-horse", "wrong"));
    assert!(!verify_secret("", "nonempty"));
    assert!(verify_secret("", ""));
}

#[test]
fn verify_secret_is_insensitive_to_length_mismatch_shape() {
    // Different-length operands must still compare false, not panic or
    // short-circuit on length.
    assert!(!verify_secret("short", "a-much-longer-secret-value"));
}

#[tokio::test]
async fn seed_board_creates_an_active_board_owned_by_creator() {
    let channel = channel("s3cr3t");
    let creator = identity(1);
    let plan = SeedPlan {
        name: "Sprint 12 Retro".into(),
        columns: vec![Column { id: "went-well".into(), name: "Went well".into(), color: None }],
        card_limit: None,
        reaction_limit: None,
        creator_hash: creator.clone(),
        shareable_link: crate::domain::ShareableLink::new("abc123abc123".into()),
    };

    let board = channel.seed_board(plan).await.unwrap();

    assert_eq!(board.creator(), &creator);
    assert!(!board.state.is_closed());
}

#[tokio::test]
async fn reset_board_reopens_a_closed_board() {
    let channel = channel("s3cr3t");
    let creator = identity(1);
    let plan = SeedPlan {
        name: "Board".into(),
        columns: vec![Column { id: "c1".into(), name: "Col".into(), color: None }],
        card_limit: None,
        reaction_limit: None,
        creator_hash: creator.clone(),
        shareable_link: crate::domain::ShareableLink::new("deadbeefdead".into()),
    };
    let board = channel.seed_board(plan).await.unwrap();
    channel.boards.close(board.id, &creator, 2_000).await.unwrap();

    channel.reset_board(board.id).await.unwrap();

    let reloaded = channel.boards.find_by_id(board.id).await.unwrap().unwrap();
    assert!(!reloaded.state.is_closed());
}
