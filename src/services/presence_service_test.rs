use std::sync::Arc;

use super::*;
use crate::domain::{Board, BoardLifecycle, Column, ShareableLink};
use crate::ports::clock::FixedClock;
use crate::ports::memory::{MemoryBoardStore, MemorySessionStore};
use crate::realtime::NoopBroadcaster;

fn identity(byte: u8) -> IdentityHash {
    IdentityHash::from_hashed(hex::encode([byte; 32]))
}

async fn harness(now: i64) -> (PresenceService, Arc<MemoryBoardStore>, BoardId, IdentityHash) {
    let boards = Arc::new(MemoryBoardStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let creator = identity(1);
    let board = Board {
        id: BoardId::new(),
        name: "Board".into(),
        columns: vec![Column { id: "c".into(), name: "C".into(), color: None }],
        admins: vec![creator.clone()],
        state: BoardLifecycle::Active,
        closed_at: None,
        card_limit: None,
        reaction_limit: None,
        creator_hash: creator.clone(),
        shareable_link: ShareableLink::new("linklinklink".into()),
        created_at: 0,
    };
    boards.insert(&board).await.unwrap();
    let service = PresenceService::new(boards.clone(), sessions, Arc::new(FixedClock::new(now)), Arc::new(NoopBroadcaster), 120);
    (service, boards, board.id, creator)
}

#[tokio::test]
async fn join_rejects_invalid_alias_and_records_admin_flag() {
    let (service, _boards, board_id, creator) = harness(1_000).await;

    let err = service.join(board_id, "", &creator).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let active = service.join(board_id, "Captain", &creator).await.unwrap();
    assert!(active.is_admin);
    assert_eq!(active.session.alias, "Captain");
}

#[tokio::test]
async fn join_is_allowed_on_a_closed_board() {
    let (service, boards, board_id, creator) = harness(1_000).await;
    boards.close(board_id, &creator, 1_000).await.unwrap();

    let viewer = identity(9);
    let active = service.join(board_id, "Viewer", &viewer).await.unwrap();
    assert!(!active.is_admin);
}

#[tokio::test]
async fn update_alias_requires_an_active_board_and_existing_session() {
    let (service, boards, board_id, creator) = harness(1_000).await;

    let err = service.update_alias(board_id, "NewName", &creator).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: NotFoundKind::User }));

    service.join(board_id, "OldName", &creator).await.unwrap();
    service.update_alias(board_id, "NewName", &creator).await.unwrap();
    let users = service.active_users(board_id).await.unwrap();
    assert_eq!(users[0].session.alias, "NewName");

    boards.close(board_id, &creator, 1_000).await.unwrap();
    let err = service.update_alias(board_id, "Nope", &creator).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict { kind: ConflictKind::BoardClosed }));
}

#[tokio::test]
async fn active_users_reflects_the_presence_window() {
    let (service, _boards, board_id, creator) = harness(1_000).await;
    service.join(board_id, "Captain", &creator).await.unwrap();

    let stale = identity(2);
    service.join(board_id, "Stale", &stale).await.unwrap();

    let users = service.active_users(board_id).await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn heartbeat_is_a_noop_without_an_existing_session() {
    let (service, _boards, board_id, creator) = harness(1_000).await;
    service.heartbeat(board_id, &creator).await.unwrap();
    let users = service.active_users(board_id).await.unwrap();
    assert!(users.is_empty());
}
