use super::*;

#[test]
fn hash_is_deterministic_and_64_char_lowercase_hex() {
    let hasher = Sha256Hasher;
    let a = hasher.hash("cookie-value");
    let b = hasher.hash("cookie-value");
    assert_eq!(a, b);
    assert_eq!(a.as_str().len(), 64);
    assert!(a.as_str().bytes().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c)));
}

#[test]
fn hash_differs_for_different_input() {
    let hasher = Sha256Hasher;
    assert_ne!(hasher.hash("a"), hasher.hash("b"));
}
