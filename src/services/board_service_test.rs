use std::sync::Arc;

use super::*;
use crate::domain::Column;
use crate::ports::clock::FixedClock;
use crate::ports::memory::{MemoryBoardStore, MemoryCardStore, MemoryReactionStore, MemorySessionStore};
use crate::realtime::NoopBroadcaster;

fn identity(byte: u8) -> IdentityHash {
    IdentityHash::from_hashed(hex::encode([byte; 32]))
}

struct Harness {
    service: BoardService,
    sessions: Arc<MemorySessionStore>,
}

fn harness() -> Harness {
    let sessions = Arc::new(MemorySessionStore::new());
    let service = BoardService::new(
        Arc::new(MemoryBoardStore::new()),
        Arc::new(MemoryCardStore::new()),
        Arc::new(MemoryReactionStore::new()),
        sessions.clone(),
        Arc::new(FixedClock::new(1_000)),
        Arc::new(NoopBroadcaster),
        12,
        5,
        120,
        "test-secret".into(),
    );
    Harness { service, sessions }
}

fn one_column_input(name: &str) -> CreateBoardInput {
    CreateBoardInput {
        name: name.into(),
        columns: vec![Column { id: "went-well".into(), name: "Went well".into(), color: None }],
        card_limit: None,
        reaction_limit: None,
    }
}

#[tokio::test]
async fn create_board_sets_creator_as_sole_admin() {
    let h = harness();
    let creator = identity(1);
    let board = h.service.create_board(one_column_input("Sprint Retro"), &creator).await.unwrap();

    assert_eq!(board.admins, vec![creator.clone()]);
    assert_eq!(board.creator(), &creator);
    assert!(!board.state.is_closed());
    assert_eq!(board.shareable_link.as_str().len(), 12);
}

#[tokio::test]
async fn create_board_rejects_too_many_columns() {
    let h = harness();
    let mut input = one_column_input("Board");
    input.columns = (0..11).map(|i| Column { id: format!("c{i}"), name: "Col".into(), color: None }).collect();

    let err = h.service.create_board(input, &identity(1)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn rename_board_requires_admin_membership() {
    let h = harness();
    let creator = identity(1);
    let stranger = identity(2);
    let board = h.service.create_board(one_column_input("Board"), &creator).await.unwrap();

    let err = h.service.rename_board(board.id, "New name", &stranger).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    h.service.rename_board(board.id, "New name", &creator).await.unwrap();
    let reloaded = h.service.get_board(board.id).await.unwrap();
    assert_eq!(reloaded.board.name, "New name");
}

#[tokio::test]
async fn closing_a_closed_board_is_idempotent() {
    let h = harness();
    let creator = identity(1);
    let board = h.service.create_board(one_column_input("Board"), &creator).await.unwrap();

    h.service.close_board(board.id, &creator).await.unwrap();
    h.service.close_board(board.id, &creator).await.unwrap();

    let reloaded = h.service.get_board(board.id).await.unwrap();
    assert!(reloaded.board.state.is_closed());
}

#[tokio::test]
async fn rename_on_closed_board_returns_board_closed() {
    let h = harness();
    let creator = identity(1);
    let board = h.service.create_board(one_column_input("Board"), &creator).await.unwrap();
    h.service.close_board(board.id, &creator).await.unwrap();

    let err = h.service.rename_board(board.id, "New name", &creator).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict { kind: ConflictKind::BoardClosed }));
}

#[tokio::test]
async fn add_admin_requires_an_active_session_for_the_target() {
    let h = harness();
    let creator = identity(1);
    let target = identity(2);
    let board = h.service.create_board(one_column_input("Board"), &creator).await.unwrap();

    let err = h.service.add_admin(board.id, &target, &creator).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    h.sessions.upsert(board.id, &target, "Target", 1_000).await.unwrap();
    h.service.add_admin(board.id, &target, &creator).await.unwrap();

    let reloaded = h.service.get_board(board.id).await.unwrap();
    assert!(reloaded.board.is_admin(&target));
}

#[tokio::test]
async fn add_admin_is_set_like() {
    let h = harness();
    let creator = identity(1);
    let target = identity(2);
    let board = h.service.create_board(one_column_input("Board"), &creator).await.unwrap();
    h.sessions.upsert(board.id, &target, "Target", 1_000).await.unwrap();

    h.service.add_admin(board.id, &target, &creator).await.unwrap();
    h.service.add_admin(board.id, &target, &creator).await.unwrap();

    let reloaded = h.service.get_board(board.id).await.unwrap();
    assert_eq!(reloaded.board.admins.iter().filter(|a| **a == target).count(), 1);
}

#[tokio::test]
async fn add_admin_rejects_non_creator() {
    let h = harness();
    let creator = identity(1);
    let other_admin = identity(2);
    let target = identity(3);
    let board = h.service.create_board(one_column_input("Board"), &creator).await.unwrap();
    h.sessions.upsert(board.id, &other_admin, "Other", 1_000).await.unwrap();
    h.service.add_admin(board.id, &other_admin, &creator).await.unwrap();
    h.sessions.upsert(board.id, &target, "Target", 1_000).await.unwrap();

    let err = h.service.add_admin(board.id, &target, &other_admin).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn delete_board_cascades_and_is_authorized_by_creator_or_secret() {
    let h = harness();
    let creator = identity(1);
    let stranger = identity(2);
    let board = h.service.create_board(one_column_input("Board"), &creator).await.unwrap();

    let err = h
        .service
        .delete_board(board.id, DeleteAuthorization::Identity(&stranger))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    h.service.delete_board(board.id, DeleteAuthorization::AdminSecret("test-secret")).await.unwrap();

    let err = h.service.get_board(board.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}
