use super::*;
use crate::ports::clock::FixedClock;
use crate::realtime::events::{CardCreated, CardMoved};

fn sample_card() -> crate::domain::Card {
    crate::domain::Card {
        id: crate::domain::CardId::new(),
        board_id: crate::domain::BoardId::new(),
        column_id: "todo".to_string(),
        content: "ship it".to_string(),
        card_type: crate::domain::CardType::Feedback,
        is_anonymous: false,
        created_by_hash: crate::domain::IdentityHash::from_hashed("abc".to_string()),
        created_by_alias: Some("anon".to_string()),
        created_at: 0,
        direct_count: 0,
        aggregated_count: 0,
        parent_id: None,
        linked_feedback_ids: Vec::new(),
    }
}

#[test]
fn wire_shape_is_flat_not_doubly_tagged() {
    let clock = FixedClock::new(1_700_000_000_000);
    let event = Event::CardCreated(CardCreated { card: sample_card() });
    let frame = Frame::new(event, &clock);

    let value: serde_json::Value = serde_json::from_str(&frame.to_json().expect("serialize")).expect("valid json");

    assert_eq!(value["type"], "card:created");
    assert_eq!(value["timestamp"], 1_700_000_000_000_i64);
    // `data` must be the event payload directly — no nested `type`/`data`
    // wrapper repeating the envelope a second time.
    assert!(value["data"].get("type").is_none());
    assert!(value["data"].get("data").is_none());
    assert!(value["data"]["card"].is_object());
}

#[test]
fn card_moved_payload_fields_are_unwrapped() {
    let clock = FixedClock::new(1);
    let event = Event::CardMoved(CardMoved {
        card_id: "c1".to_string(),
        board_id: "b1".to_string(),
        column_id: "done".to_string(),
    });
    let frame = Frame::new(event, &clock);

    let value: serde_json::Value = serde_json::from_str(&frame.to_json().expect("serialize")).expect("valid json");

    assert_eq!(value["type"], "card:moved");
    assert_eq!(value["data"]["card_id"], "c1");
    assert_eq!(value["data"]["column_id"], "done");
}
