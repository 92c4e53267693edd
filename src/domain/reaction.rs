//! Reaction — component F's document shape.

use serde::{Deserialize, Serialize};

use super::ids::{CardId, IdentityHash, ReactionId};
use super::time::Timestamp;

/// Reaction kind is left unenumerated by the source spec; bounded freeform
/// text validated at construction rather than an invented closed set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionKind(String);

impl ReactionKind {
    pub const MAX_LEN: usize = 32;

    pub fn new(raw: impl Into<String>) -> Result<Self, crate::error::AppError> {
        let raw = raw.into();
        if raw.is_empty() || raw.chars().count() > Self::MAX_LEN {
            return Err(crate::error::AppError::validation("reaction kind must be 1..32 chars"));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub id: ReactionId,
    pub card_id: CardId,
    pub identity_hash: IdentityHash,
    pub alias: String,
    pub kind: ReactionKind,
    pub created_at: Timestamp,
}
