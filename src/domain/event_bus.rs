//! Broadcast channel for presence events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The presence
//! service publishes one [`PresenceEvent`] per incoming sample or
//! disconnect, and every WebSocket connection task subscribes and filters
//! events against its own room.

use tokio::sync::broadcast;

use super::PresenceEvent;

/// Broadcast bus for [`PresenceEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest events are dropped for lagging
/// receivers — acceptable here because updates are idempotent by
/// replacement, so a missed sample is superseded by the next one.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PresenceEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event. With no
    /// active receivers the event is silently dropped — fire-and-forget,
    /// no delivery guarantee beyond the channel itself.
    pub fn publish(&self, event: PresenceEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will see all future events.
    ///
    /// Each WebSocket connection calls this once on upgrade.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PresenceEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
