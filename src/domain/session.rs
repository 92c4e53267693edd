//! Session — component D's document shape, and the transient Subscriber.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::{BoardId, IdentityHash};
use super::time::Timestamp;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub board_id: BoardId,
    pub identity_hash: IdentityHash,
    pub alias: String,
    pub last_active: Timestamp,
    pub created_at: Timestamp,
}

/// A session enriched with its admin status, computed against the current
/// board admin set (never persisted).
#[derive(Debug, Clone, Serialize)]
pub struct ActiveSession {
    #[serde(flatten)]
    pub session: Session,
    pub is_admin: bool,
}

/// Transient, never persisted — the live handle for one websocket connection.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub subscriber_id: Uuid,
    pub identity_hash: IdentityHash,
    pub current_board_id: Option<BoardId>,
    pub connected_at: Timestamp,
}

/// Alias validation: 1..50 chars, matching `^[A-Za-z0-9 _-]+$`.
#[must_use]
pub fn is_valid_alias(alias: &str) -> bool {
    let len = alias.chars().count();
    (1..=50).contains(&len)
        && alias
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b' ' || b == b'_' || b == b'-')
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
