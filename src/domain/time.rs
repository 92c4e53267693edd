//! Millisecond-precision timestamp used throughout the domain and wire types.

/// Milliseconds since the Unix epoch, UTC. Produced exclusively by the Clock port.
pub type Timestamp = i64;
