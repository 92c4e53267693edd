use super::*;

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_config_env() {
    unsafe {
        std::env::remove_var("MONGO_URL");
        std::env::remove_var("MONGO_DB_NAME");
        std::env::remove_var("PORT");
        std::env::remove_var("PRESENCE_WINDOW_SECONDS");
        std::env::remove_var("SHAREABLE_LINK_LENGTH");
        std::env::remove_var("SHAREABLE_LINK_RETRY_COUNT");
        std::env::remove_var("SUBSCRIBER_HEARTBEAT_TIMEOUT_SECONDS");
        std::env::remove_var("SUBSCRIBER_SEND_QUEUE_CAPACITY");
        std::env::remove_var("ADMIN_SECRET");
        std::env::remove_var("DEFAULT_CARD_LIMIT");
        std::env::remove_var("DEFAULT_REACTION_LIMIT");
    }
}

#[test]
fn from_env_requires_mongo_url() {
    unsafe {
        clear_config_env();
        std::env::set_var("ADMIN_SECRET", "s3cret");
    }

    let err = Config::from_env().unwrap_err();
    assert!(err.contains("MONGO_URL"));

    unsafe { clear_config_env() };
}

#[test]
fn from_env_requires_admin_secret() {
    unsafe {
        clear_config_env();
        std::env::set_var("MONGO_URL", "mongodb://localhost:27017");
    }

    let err = Config::from_env().unwrap_err();
    assert!(err.contains("ADMIN_SECRET"));

    unsafe { clear_config_env() };
}

#[test]
fn from_env_applies_defaults() {
    unsafe {
        clear_config_env();
        std::env::set_var("MONGO_URL", "mongodb://localhost:27017");
        std::env::set_var("ADMIN_SECRET", "s3cret");
    }

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.presence_window_seconds, DEFAULT_PRESENCE_WINDOW_SECONDS);
    assert_eq!(cfg.shareable_link_length, DEFAULT_SHAREABLE_LINK_LENGTH);
    assert_eq!(cfg.shareable_link_retry_count, DEFAULT_SHAREABLE_LINK_RETRY_COUNT);
    assert_eq!(cfg.default_card_limit, None);
    assert_eq!(cfg.default_reaction_limit, None);

    unsafe { clear_config_env() };
}

#[test]
fn from_env_parses_overrides_and_optional_limits() {
    unsafe {
        clear_config_env();
        std::env::set_var("MONGO_URL", "mongodb://localhost:27017");
        std::env::set_var("ADMIN_SECRET", "s3cret");
        std::env::set_var("PRESENCE_WINDOW_SECONDS", "60");
        std::env::set_var("DEFAULT_CARD_LIMIT", "10");
        std::env::set_var("DEFAULT_REACTION_LIMIT", "5");
    }

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.presence_window_seconds, 60);
    assert_eq!(cfg.default_card_limit, Some(10));
    assert_eq!(cfg.default_reaction_limit, Some(5));

    unsafe { clear_config_env() };
}

#[test]
fn from_env_rejects_unparsable_numeric_override() {
    unsafe {
        clear_config_env();
        std::env::set_var("MONGO_URL", "mongodb://localhost:27017");
        std::env::set_var("ADMIN_SECRET", "s3cret");
        std::env::set_var("PRESENCE_WINDOW_SECONDS", "not-a-number");
    }

    let err = Config::from_env().unwrap_err();
    assert!(err.contains("PRESENCE_WINDOW_SECONDS"));

    unsafe { clear_config_env() };
}
