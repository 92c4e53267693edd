use super::*;

#[test]
fn alias_accepts_allowed_charset_within_length() {
    assert!(is_valid_alias("Ada Lovelace_1"));
    assert!(is_valid_alias("a"));
    assert!(is_valid_alias(&"a".repeat(50)));
}

#[test]
fn alias_rejects_empty_and_overlong_and_bad_chars() {
    assert!(!is_valid_alias(""));
    assert!(!is_valid_alias(&"a".repeat(51)));
    assert!(!is_valid_alias("bad:alias"));
}
