//! Opaque identifiers and other newtype-validated strings from the data model.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

macro_rules! object_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub ObjectId);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            #[must_use]
            pub fn inner(&self) -> ObjectId {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<ObjectId> for $name {
            fn from(id: ObjectId) -> Self {
                Self(id)
            }
        }

        impl std::str::FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ObjectId::parse_str(s)
                    .map(Self)
                    .map_err(|_| AppError::validation(format!("{}: not a 24-hex id", stringify!($name))))
            }
        }
    };
}

object_id_newtype!(BoardId);
object_id_newtype!(CardId);
object_id_newtype!(ReactionId);

/// One-way hash of a user's opaque session cookie: the sole durable identifier.
///
/// Fixed-size, 64-char lowercase hex (the Hasher port's output shape).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityHash(String);

impl IdentityHash {
    /// Wrap a hash value already known to have the right shape (e.g. a
    /// `Hasher` port output). Panics in debug builds on malformed input,
    /// since that would indicate a bug in the Hasher adapter, not user input.
    #[must_use]
    pub fn from_hashed(hash: String) -> Self {
        debug_assert!(is_lowercase_hex(&hash, 64), "hasher produced malformed hash: {hash}");
        Self(hash)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The short opaque code that routes to a board. Globally unique (invariant 8).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareableLink(String);

impl ShareableLink {
    #[must_use]
    pub fn new(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareableLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_lowercase_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Column ids are free-form within a board, matching `^[A-Za-z0-9_-]+$`.
#[must_use]
pub fn is_valid_column_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
#[path = "ids_test.rs"]
mod tests;
