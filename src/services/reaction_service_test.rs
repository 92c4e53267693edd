use std::sync::Arc;

use super::*;
use crate::domain::{Board, BoardLifecycle, Card, CardType, Column, ShareableLink};
use crate::ports::clock::FixedClock;
use crate::ports::memory::{MemoryBoardStore, MemoryCardStore, MemoryReactionStore};
use crate::realtime::NoopBroadcaster;

fn identity(byte: u8) -> IdentityHash {
    IdentityHash::from_hashed(hex::encode([byte; 32]))
}

struct Harness {
    service: ReactionService,
    cards: Arc<MemoryCardStore>,
    boards: Arc<MemoryBoardStore>,
}

async fn harness(reaction_limit: Option<u32>, default_reaction_limit: Option<u32>) -> (Harness, BoardId, CardId) {
    let boards = Arc::new(MemoryBoardStore::new());
    let cards = Arc::new(MemoryCardStore::new());
    let reactions = Arc::new(MemoryReactionStore::new());
    let creator = identity(1);
    let board = Board {
        id: BoardId::new(),
        name: "Board".into(),
        columns: vec![Column { id: "c".into(), name: "C".into(), color: None }],
        admins: vec![creator.clone()],
        state: BoardLifecycle::Active,
        closed_at: None,
        card_limit: None,
        reaction_limit,
        creator_hash: creator.clone(),
        shareable_link: ShareableLink::new("linklinklink".into()),
        created_at: 0,
    };
    boards.insert(&board).await.unwrap();

    let card = Card {
        id: CardId::new(),
        board_id: board.id,
        column_id: "c".into(),
        content: "hello".into(),
        card_type: CardType::Feedback,
        is_anonymous: false,
        created_by_hash: creator.clone(),
        created_by_alias: Some("U1".into()),
        created_at: 0,
        direct_count: 0,
        aggregated_count: 0,
        parent_id: None,
        linked_feedback_ids: Vec::new(),
    };
    cards.insert(&card).await.unwrap();

    let service = ReactionService::new(
        boards.clone(),
        cards.clone(),
        reactions,
        Arc::new(FixedClock::new(1_000)),
        Arc::new(NoopBroadcaster),
        default_reaction_limit,
    );
    (Harness { service, cards, boards }, board.id, card.id)
}

#[tokio::test]
async fn add_reaction_increments_direct_count_only_on_first_insert() {
    let (h, _board_id, card_id) = harness(None, None).await;
    let identity = identity(2);
    let kind = crate::domain::ReactionKind::new("thumbs_up").unwrap();

    h.service.add_reaction(card_id, kind.clone(), &identity, "U2").await.unwrap();
    let card = h.cards.find_by_id(card_id).await.unwrap().unwrap();
    assert_eq!(card.direct_count, 1);

    let other_kind = crate::domain::ReactionKind::new("heart").unwrap();
    h.service.add_reaction(card_id, other_kind, &identity, "U2").await.unwrap();
    let card = h.cards.find_by_id(card_id).await.unwrap().unwrap();
    assert_eq!(card.direct_count, 1, "re-reacting updates kind in place, not the counter");
}

#[tokio::test]
async fn add_reaction_propagates_to_parent_aggregated_count() {
    let (h, board_id, child_id) = harness(None, None).await;
    let parent = Card {
        id: CardId::new(),
        board_id,
        column_id: "c".into(),
        content: "parent".into(),
        card_type: CardType::Feedback,
        is_anonymous: false,
        created_by_hash: identity(1),
        created_by_alias: Some("U1".into()),
        created_at: 0,
        direct_count: 0,
        aggregated_count: 0,
        parent_id: None,
        linked_feedback_ids: Vec::new(),
    };
    h.cards.insert(&parent).await.unwrap();
    h.cards.set_parent(child_id, Some(parent.id)).await.unwrap();

    let kind = crate::domain::ReactionKind::new("thumbs_up").unwrap();
    h.service.add_reaction(child_id, kind, &identity(2), "U2").await.unwrap();

    let reloaded_parent = h.cards.find_by_id(parent.id).await.unwrap().unwrap();
    assert_eq!(reloaded_parent.aggregated_count, 1);
}

#[tokio::test]
async fn add_reaction_enforces_the_board_reaction_limit() {
    let (h, board_id, _card_id) = harness(Some(1), None).await;
    let identity = identity(2);

    let second_card = Card {
        id: CardId::new(),
        board_id,
        column_id: "c".into(),
        content: "second".into(),
        card_type: CardType::Feedback,
        is_anonymous: false,
        created_by_hash: identity.clone(),
        created_by_alias: Some("U2".into()),
        created_at: 0,
        direct_count: 0,
        aggregated_count: 0,
        parent_id: None,
        linked_feedback_ids: Vec::new(),
    };
    h.cards.insert(&second_card).await.unwrap();

    let first_card = h.cards.list_by_board(board_id).await.unwrap().into_iter().find(|c| c.id != second_card.id).unwrap();
    let kind = crate::domain::ReactionKind::new("thumbs_up").unwrap();
    h.service.add_reaction(first_card.id, kind.clone(), &identity, "U2").await.unwrap();

    let err = h.service.add_reaction(second_card.id, kind, &identity, "U2").await.unwrap_err();
    assert!(matches!(err, AppError::LimitExceeded { kind: LimitKind::ReactionLimit, current: 1, limit: 1 }));
}

#[tokio::test]
async fn add_reaction_rejects_on_a_closed_board() {
    let (h, board_id, card_id) = harness(None, None).await;
    h.boards.close(board_id, &identity(1), 1_000).await.unwrap();

    let kind = crate::domain::ReactionKind::new("thumbs_up").unwrap();
    let err = h.service.add_reaction(card_id, kind, &identity(2), "U2").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict { kind: ConflictKind::BoardClosed }));
}

#[tokio::test]
async fn remove_reaction_decrements_counters_and_errors_when_absent() {
    let (h, _board_id, card_id) = harness(None, None).await;
    let identity = identity(2);

    let err = h.service.remove_reaction(card_id, &identity).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: NotFoundKind::Reaction }));

    let kind = crate::domain::ReactionKind::new("thumbs_up").unwrap();
    h.service.add_reaction(card_id, kind, &identity, "U2").await.unwrap();
    h.service.remove_reaction(card_id, &identity).await.unwrap();

    let card = h.cards.find_by_id(card_id).await.unwrap().unwrap();
    assert_eq!(card.direct_count, 0);
}

#[tokio::test]
async fn check_reaction_quota_reports_limit_enabled_only_when_configured() {
    let (h, board_id, _card_id) = harness(None, None).await;
    let quota = h.service.check_reaction_quota(board_id, &identity(2)).await.unwrap();
    assert!(!quota.limit_enabled);

    let (h, board_id, _card_id) = harness(Some(2), None).await;
    let quota = h.service.check_reaction_quota(board_id, &identity(2)).await.unwrap();
    assert!(quota.limit_enabled);
    assert_eq!(quota.limit, Some(2));
}
