//! Board and Column — component C's document shape.

use serde::{Deserialize, Serialize};

use super::ids::{BoardId, IdentityHash, ShareableLink};
use super::session::ActiveSession;
use super::time::Timestamp;

/// Embedded column. Column ids are unique within their board and match
/// `^[A-Za-z0-9_-]+$` (validated at the boundary, not here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// A board's lifecycle position. Transitions once, `Active -> Closed` (invariant 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardLifecycle {
    Active,
    Closed,
}

impl BoardLifecycle {
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub columns: Vec<Column>,
    /// Ordered; `admins[0]` is the creator and is immutable (invariant 7).
    pub admins: Vec<IdentityHash>,
    pub state: BoardLifecycle,
    pub closed_at: Option<Timestamp>,
    pub card_limit: Option<u32>,
    pub reaction_limit: Option<u32>,
    pub creator_hash: IdentityHash,
    pub shareable_link: ShareableLink,
    pub created_at: Timestamp,
}

impl Board {
    #[must_use]
    pub fn creator(&self) -> &IdentityHash {
        // Invariant: admins is non-empty and admins[0] is the creator.
        &self.admins[0]
    }

    #[must_use]
    pub fn is_admin(&self, identity: &IdentityHash) -> bool {
        self.admins.contains(identity)
    }

    #[must_use]
    pub fn has_column(&self, column_id: &str) -> bool {
        self.columns.iter().any(|c| c.id == column_id)
    }
}

/// A board enriched with its currently-active sessions (§4.1 `GetBoard`),
/// for the read path only — never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub active_users: Vec<ActiveSession>,
}
