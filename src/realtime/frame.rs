//! Wire frame: `{type, data, timestamp}` (§4.5 "Subscriber protocol").

use serde::Serialize;

use crate::domain::Timestamp;
use crate::ports::Clock;

use super::events::Event;

#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Event,
    pub timestamp: Timestamp,
}

impl Frame {
    #[must_use]
    pub fn new(event: Event, clock: &dyn Clock) -> Self {
        Self { kind: event.kind(), timestamp: clock.now(), data: event }
    }

    /// Serializes to the JSON text sent over the subscriber's websocket.
    ///
    /// # Errors
    ///
    /// Returns an error only if an `Event` payload somehow fails to
    /// serialize, which would indicate a bug in a payload type, not bad
    /// input — all fields are plain strings and numbers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;
