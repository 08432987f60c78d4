//! In-process fan-out of [`Event`]s over a tokio broadcast channel.
//!
//! Slow subscribers lose the oldest events rather than block publishers.

use std::sync::Arc;

use log::{debug, trace, warn};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::events::{Event, EventMessage};

const DEFAULT_CAPACITY: usize = 256;

/// Publish/subscribe hub shared by services and WebSocket handlers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    /// Bus buffering up to 256 undelivered events per subscriber.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` bounds how far a subscriber may fall behind before it
    /// starts losing events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sender: broadcast::channel(capacity).0,
        }
    }

    /// Publish to every current subscriber without blocking.
    ///
    /// Returns the number of subscribers the event was delivered to.
    pub fn publish(&self, event: Event) -> usize {
        let message = EventMessage::new(event);
        let kind = message.event.event_type();
        let delivered = self.sender.send(message).unwrap_or(0);
        trace!("{} delivered to {} subscriber(s)", kind, delivered);
        delivered
    }

    /// Only events published after this call are received.
    pub fn subscribe(&self) -> EventSubscriber {
        let receiver = self.sender.subscribe();
        debug!("Event bus subscriber added ({} active)", self.subscriber_count());
        EventSubscriber { receiver }
    }

    /// Live subscribers; dropped ones are no longer counted.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end handed out by [`EventBus::subscribe`]
pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
}

impl EventSubscriber {
    /// Wait for the next event, skipping past any that were lost to lag.
    ///
    /// `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber skipped {} events", skipped)
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-queued event, if any.
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Event subscriber skipped {} events", skipped)
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

/// Event bus shared across tasks
pub type SharedEventBus = Arc<EventBus>;

/// New bus with the default capacity.
pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}
