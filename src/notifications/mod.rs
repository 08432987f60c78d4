//! Notifications module
//!
//! In-process pub/sub for billing-mode and pricing events. WebSocket
//! clients receive them through `interfaces::ws`.

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::*;
