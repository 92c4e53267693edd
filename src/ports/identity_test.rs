use std::sync::Arc;

use super::*;
use crate::ports::hasher::Sha256Hasher;

#[test]
fn identity_of_with_cookie_hashes_deterministically_and_issues_nothing() {
    let identity = CookieIdentity::new(Arc::new(Sha256Hasher));
    let resolved_a = identity.identity_of(Some("abc"));
    let resolved_b = identity.identity_of(Some("abc"));
    assert_eq!(resolved_a.identity_hash, resolved_b.identity_hash);
    assert!(resolved_a.new_cookie.is_none());
}

#[test]
fn identity_of_without_cookie_mints_a_fresh_one_each_time() {
    let identity = CookieIdentity::new(Arc::new(Sha256Hasher));
    let a = identity.identity_of(None);
    let b = identity.identity_of(None);
    assert!(a.new_cookie.is_some());
    assert!(b.new_cookie.is_some());
    assert_ne!(a.identity_hash, b.identity_hash);
}
