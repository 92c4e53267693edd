//! Identity port (component B) — `IdentityOf(request) -> { identityHash, rawCookie | noCookie }`.
//!
//! Cookie issuance mechanics (headers, `Set-Cookie`, expiry) are an external
//! collaborator's concern; this port only covers the part in scope: turning
//! a raw cookie value into a durable `IdentityHash` via the Hasher port, and
//! minting a fresh opaque cookie value on first contact.

use std::sync::Arc;

use rand::Rng;

use crate::domain::IdentityHash;
use crate::ports::hasher::Hasher;

/// The result of resolving identity for one request: the durable hash, and
/// — if no cookie was presented — a newly minted raw cookie value the
/// caller (an external collaborator) is responsible for setting.
#[derive(Debug, Clone)]
pub struct ResolvedIdentity {
    pub identity_hash: IdentityHash,
    pub new_cookie: Option<String>,
}

pub trait IdentitySource: Send + Sync {
    fn identity_of(&self, raw_cookie: Option<&str>) -> ResolvedIdentity;
}

pub struct CookieIdentity {
    hasher: Arc<dyn Hasher>,
}

impl CookieIdentity {
    #[must_use]
    pub fn new(hasher: Arc<dyn Hasher>) -> Self {
        Self { hasher }
    }

    fn mint_cookie() -> String {
        let bytes: [u8; 32] = rand::rng().random();
        hex::encode(bytes)
    }
}

impl IdentitySource for CookieIdentity {
    fn identity_of(&self, raw_cookie: Option<&str>) -> ResolvedIdentity {
        match raw_cookie {
            Some(raw) if !raw.is_empty() => {
                ResolvedIdentity { identity_hash: self.hasher.hash(raw), new_cookie: None }
            }
            _ => {
                let minted = Self::mint_cookie();
                let identity_hash = self.hasher.hash(&minted);
                ResolvedIdentity { identity_hash, new_cookie: Some(minted) }
            }
        }
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
