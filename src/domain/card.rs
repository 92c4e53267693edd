//! Card — component E's document shape.

use serde::{Deserialize, Serialize};

use super::ids::{BoardId, CardId, IdentityHash};
use super::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Feedback,
    Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub column_id: String,
    pub content: String,
    pub card_type: CardType,
    pub is_anonymous: bool,
    pub created_by_hash: IdentityHash,
    /// `None` iff `is_anonymous`.
    pub created_by_alias: Option<String>,
    pub created_at: Timestamp,
    pub direct_count: u32,
    pub aggregated_count: u32,
    /// Always `None` for action cards (depth-1 parent-child applies to
    /// feedback cards only).
    pub parent_id: Option<CardId>,
    /// Only populated for action cards; empty for feedback cards.
    pub linked_feedback_ids: Vec<CardId>,
}

impl Card {
    #[must_use]
    pub fn is_feedback(&self) -> bool {
        matches!(self.card_type, CardType::Feedback)
    }

    #[must_use]
    pub fn is_action(&self) -> bool {
        matches!(self.card_type, CardType::Action)
    }

    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A card enriched with its children (sorted by `created_at` ascending) and
/// resolved linked-feedback cards, for the aggregated read path.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    #[serde(flatten)]
    pub card: Card,
    pub children: Vec<Card>,
    pub linked_feedback_cards: Vec<Card>,
}
