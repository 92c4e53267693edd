//! Real-time fan-out plane: Event Broadcaster (K) and Subscription Gateway (L).

pub mod broadcaster;
pub mod events;
pub mod frame;
pub mod gateway;

pub use broadcaster::{Broadcaster, GatewayBroadcaster, NoopBroadcaster};
pub use events::Event;
pub use frame::Frame;
pub use gateway::Gateway;
