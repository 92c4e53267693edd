//! Hasher port (component B) — fixed-size one-way `Hash(cookie)`.

use sha2::{Digest, Sha256};

use crate::domain::IdentityHash;

pub trait Hasher: Send + Sync {
    /// Deterministic, one-way, fixed-size (64-char lowercase hex) hash.
    fn hash(&self, cookie_value: &str) -> IdentityHash;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, cookie_value: &str) -> IdentityHash {
        let digest = Sha256::digest(cookie_value.as_bytes());
        IdentityHash::from_hashed(hex::encode(digest))
    }
}

#[cfg(test)]
#[path = "hasher_test.rs"]
mod tests;
