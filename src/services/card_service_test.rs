use std::sync::Arc;

use super::*;
use crate::domain::{Board, BoardLifecycle, Column, ShareableLink};
use crate::ports::clock::FixedClock;
use crate::ports::memory::{MemoryBoardStore, MemoryCardStore, MemoryReactionStore};
use crate::realtime::NoopBroadcaster;

fn identity(byte: u8) -> IdentityHash {
    IdentityHash::from_hashed(hex::encode([byte; 32]))
}

struct Harness {
    service: CardService,
    boards: Arc<MemoryBoardStore>,
}

async fn harness_with_board(default_card_limit: Option<u32>, card_limit: Option<u32>) -> (Harness, BoardId) {
    let boards = Arc::new(MemoryBoardStore::new());
    let cards = Arc::new(MemoryCardStore::new());
    let reactions = Arc::new(MemoryReactionStore::new());
    let creator = identity(1);
    let board = Board {
        id: BoardId::new(),
        name: "Board".into(),
        columns: vec![
            Column { id: "col-a".into(), name: "A".into(), color: None },
            Column { id: "col-b".into(), name: "B".into(), color: None },
        ],
        admins: vec![creator.clone()],
        state: BoardLifecycle::Active,
        closed_at: None,
        card_limit,
        reaction_limit: None,
        creator_hash: creator,
        shareable_link: ShareableLink::new("abc123abc123".into()),
        created_at: 0,
    };
    boards.insert(&board).await.unwrap();
    let service =
        CardService::new(boards.clone(), cards, reactions, Arc::new(FixedClock::new(1_000)), Arc::new(NoopBroadcaster), default_card_limit);
    (Harness { service, boards }, board.id)
}

#[tokio::test]
async fn create_card_sets_zeroed_counters_and_alias_per_anonymity() {
    let (h, board_id) = harness_with_board(None, None).await;
    let identity = identity(1);

    let named = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "hello".into(), card_type: CardType::Feedback, is_anonymous: false },
            &identity,
            "Alice",
        )
        .await
        .unwrap();
    assert_eq!(named.created_by_alias.as_deref(), Some("Alice"));
    assert_eq!(named.direct_count, 0);
    assert_eq!(named.aggregated_count, 0);

    let anon = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "shh".into(), card_type: CardType::Feedback, is_anonymous: true },
            &identity,
            "Alice",
        )
        .await
        .unwrap();
    assert_eq!(anon.created_by_alias, None);
    assert_eq!(anon.created_by_hash, identity);
}

#[tokio::test]
async fn create_card_rejects_unknown_column() {
    let (h, board_id) = harness_with_board(None, None).await;
    let err = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "nope".into(), content: "hi".into(), card_type: CardType::Feedback, is_anonymous: false },
            &identity(1),
            "Alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { kind: NotFoundKind::Column }));
}

#[tokio::test]
async fn card_limit_boundary_blocks_the_nplus1th_feedback_card_but_not_actions() {
    let (h, board_id) = harness_with_board(None, Some(3)).await;
    let identity = identity(1);
    for _ in 0..3 {
        h.service
            .create_card(
                board_id,
                CreateCardInput { column_id: "col-a".into(), content: "c".into(), card_type: CardType::Feedback, is_anonymous: false },
                &identity,
                "U1",
            )
            .await
            .unwrap();
    }
    let err = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "c4".into(), card_type: CardType::Feedback, is_anonymous: false },
            &identity,
            "U1",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LimitExceeded { kind: LimitKind::CardLimit, current: 3, limit: 3 }));

    h.service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "action".into(), card_type: CardType::Action, is_anonymous: false },
            &identity,
            "U1",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn update_card_is_creator_only_and_closed_board_guarded() {
    let (h, board_id) = harness_with_board(None, None).await;
    let creator = identity(1);
    let stranger = identity(2);
    let card = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "v1".into(), card_type: CardType::Feedback, is_anonymous: false },
            &creator,
            "U1",
        )
        .await
        .unwrap();

    let err = h.service.update_card(card.id, "v2", &stranger).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    let updated = h.service.update_card(card.id, "v2", &creator).await.unwrap();
    assert_eq!(updated.content, "v2");
}

#[tokio::test]
async fn aggregation_propagates_through_reactions_link_and_delete() {
    let (h, board_id) = harness_with_board(None, None).await;
    let u1 = identity(1);
    let u2 = identity(2);
    let p = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "parent".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u1,
            "U1",
        )
        .await
        .unwrap();
    let c = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "child".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u2,
            "U2",
        )
        .await
        .unwrap();

    h.service.link_cards(p.id, c.id, LinkKind::ParentOf, &u1).await.unwrap();
    let view = h.service.get_card(p.id, true).await.unwrap();
    assert_eq!(view.card.aggregated_count, 0);
    assert_eq!(view.children.len(), 1);

    h.service.delete_card(c.id, &u2).await.unwrap();
    let view = h.service.get_card(p.id, true).await.unwrap();
    assert_eq!(view.children.len(), 0);
}

#[tokio::test]
async fn parent_of_link_rejects_self_link_and_non_feedback() {
    let (h, board_id) = harness_with_board(None, None).await;
    let u1 = identity(1);
    let card = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "p".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u1,
            "U1",
        )
        .await
        .unwrap();

    let err = h.service.link_cards(card.id, card.id, LinkKind::ParentOf, &u1).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict { kind: ConflictKind::CircularRelationship }));

    let action = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "a".into(), card_type: CardType::Action, is_anonymous: false },
            &u1,
            "U1",
        )
        .await
        .unwrap();
    let err = h.service.link_cards(card.id, action.id, LinkKind::ParentOf, &u1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn link_then_unlink_restores_aggregated_count_and_parent() {
    let (h, board_id) = harness_with_board(None, None).await;
    let u1 = identity(1);
    let u2 = identity(2);
    let p = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "p".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u1,
            "U1",
        )
        .await
        .unwrap();
    let c = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "c".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u2,
            "U2",
        )
        .await
        .unwrap();

    h.service.link_cards(p.id, c.id, LinkKind::ParentOf, &u1).await.unwrap();
    h.service.unlink_cards(p.id, c.id, LinkKind::ParentOf, &u1).await.unwrap();

    let view = h.service.get_card(c.id, false).await.unwrap();
    assert_eq!(view.card.parent_id, None);
    let parent_view = h.service.get_card(p.id, false).await.unwrap();
    assert_eq!(parent_view.card.aggregated_count, 0);
}

#[tokio::test]
async fn unlink_cards_rejects_mismatched_parent_of_pair() {
    let (h, board_id) = harness_with_board(None, None).await;
    let u1 = identity(1);
    let a = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "a".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u1,
            "U1",
        )
        .await
        .unwrap();
    let b = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "b".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u1,
            "U1",
        )
        .await
        .unwrap();
    let unrelated = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "unrelated".into(), card_type: CardType::Feedback, is_anonymous: false },
            &u1,
            "U1",
        )
        .await
        .unwrap();

    h.service.link_cards(a.id, b.id, LinkKind::ParentOf, &u1).await.unwrap();

    let err = h.service.unlink_cards(a.id, unrelated.id, LinkKind::ParentOf, &u1).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // the real parent/child pair must be untouched
    let b_view = h.service.get_card(b.id, false).await.unwrap();
    assert_eq!(b_view.card.parent_id, Some(a.id));
    let a_view = h.service.get_card(a.id, false).await.unwrap();
    assert_eq!(a_view.card.aggregated_count, b_view.card.direct_count);
}

#[tokio::test]
async fn delete_card_requires_creator() {
    let (h, board_id) = harness_with_board(None, None).await;
    let creator = identity(1);
    let stranger = identity(2);
    let card = h
        .service
        .create_card(
            board_id,
            CreateCardInput { column_id: "col-a".into(), content: "c".into(), card_type: CardType::Feedback, is_anonymous: false },
            &creator,
            "U1",
        )
        .await
        .unwrap();

    let err = h.service.delete_card(card.id, &stranger).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn check_card_quota_reports_limit_enabled_only_when_configured() {
    let (h, board_id) = harness_with_board(None, None).await;
    let quota = h.service.check_card_quota(board_id, &identity(1)).await.unwrap();
    assert!(!quota.limit_enabled);
    assert!(quota.can_create);

    let (h, board_id) = harness_with_board(None, Some(2)).await;
    let quota = h.service.check_card_quota(board_id, &identity(1)).await.unwrap();
    assert!(quota.limit_enabled);
    assert_eq!(quota.limit, Some(2));
}

#[allow(unused)]
fn _unused_board_field_keeps_harness_alive(h: &Harness) -> &MemoryBoardStore {
    h.boards.as_ref()
}
