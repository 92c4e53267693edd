//! Immutable startup configuration (§6 "Configuration (enumerated)").

const DEFAULT_PRESENCE_WINDOW_SECONDS: u64 = 120;
const DEFAULT_SHAREABLE_LINK_LENGTH: usize = 12;
const DEFAULT_SHAREABLE_LINK_RETRY_COUNT: usize = 5;
const DEFAULT_SUBSCRIBER_HEARTBEAT_TIMEOUT_SECONDS: u64 = 35;
const DEFAULT_SUBSCRIBER_SEND_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_url: String,
    pub mongo_db_name: String,
    pub port: u16,
    /// Sliding active-user window, in seconds.
    pub presence_window_seconds: u64,
    /// Hex length of the board short code.
    pub shareable_link_length: usize,
    /// Retries on duplicate-key collision during board creation.
    pub shareable_link_retry_count: usize,
    /// Socket idle timeout before the gateway closes a subscriber connection.
    pub subscriber_heartbeat_timeout_seconds: u64,
    /// Backpressure point before dropping frames for a slow consumer.
    pub subscriber_send_queue_capacity: usize,
    /// Preshared admin back-channel secret. Required, no default.
    pub admin_secret: String,
    /// Per-user feedback-card cap when a board doesn't specify one. `None` = unlimited.
    pub default_card_limit: Option<u32>,
    /// Per-user reaction cap when a board doesn't specify one. `None` = unlimited.
    pub default_reaction_limit: Option<u32>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error if a required variable (`MONGO_URL`,
    /// `ADMIN_SECRET`) is missing, or an optional numeric variable is set but
    /// unparsable.
    pub fn from_env() -> Result<Self, String> {
        let mongo_url = std::env::var("MONGO_URL").map_err(|_| "MONGO_URL is required".to_string())?;
        let admin_secret = std::env::var("ADMIN_SECRET").map_err(|_| "ADMIN_SECRET is required".to_string())?;

        Ok(Self {
            mongo_url,
            mongo_db_name: std::env::var("MONGO_DB_NAME").unwrap_or_else(|_| "retro_pulse".to_string()),
            port: env_parse("PORT", 3000)?,
            presence_window_seconds: env_parse("PRESENCE_WINDOW_SECONDS", DEFAULT_PRESENCE_WINDOW_SECONDS)?,
            shareable_link_length: env_parse("SHAREABLE_LINK_LENGTH", DEFAULT_SHAREABLE_LINK_LENGTH)?,
            shareable_link_retry_count: env_parse("SHAREABLE_LINK_RETRY_COUNT", DEFAULT_SHAREABLE_LINK_RETRY_COUNT)?,
            subscriber_heartbeat_timeout_seconds: env_parse(
                "SUBSCRIBER_HEARTBEAT_TIMEOUT_SECONDS",
                DEFAULT_SUBSCRIBER_HEARTBEAT_TIMEOUT_SECONDS,
            )?,
            subscriber_send_queue_capacity: env_parse(
                "SUBSCRIBER_SEND_QUEUE_CAPACITY",
                DEFAULT_SUBSCRIBER_SEND_QUEUE_CAPACITY,
            )?,
            admin_secret,
            default_card_limit: env_parse_opt("DEFAULT_CARD_LIMIT")?,
            default_reaction_limit: env_parse_opt("DEFAULT_REACTION_LIMIT")?,
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(v) => v.parse::<T>().map_err(|_| format!("{key}: invalid value {v:?}")),
        Err(_) => Ok(default),
    }
}

fn env_parse_opt<T>(key: &str) -> Result<Option<T>, String>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(v) => v.parse::<T>().map(Some).map_err(|_| format!("{key}: invalid value {v:?}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
