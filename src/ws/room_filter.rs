//! Per-connection delivery filter.
//!
//! Tracks which room a WebSocket connection currently belongs to and
//! decides which bus events reach its client.

use crate::domain::RoomName;

/// Delivery filter for a single WebSocket connection.
///
/// The connection task keeps this beside the registry entry it writes on
/// `join-room`; filtering against the local copy keeps the fan-out path
/// free of registry locks.
#[derive(Debug, Default)]
pub struct RoomFilter {
    room: Option<RoomName>,
}

impl RoomFilter {
    /// Creates a filter with no room membership.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the connection's current room (last join wins).
    pub fn set_room(&mut self, room: RoomName) {
        self.room = Some(room);
    }

    /// Returns the connection's current room, if any.
    #[must_use]
    pub fn current(&self) -> Option<&RoomName> {
        self.room.as_ref()
    }

    /// Returns `true` if an event scoped to `event_room` should reach
    /// this connection.
    ///
    /// Unscoped events (`None`) reach everyone; scoped events reach only
    /// current members of the named room.
    #[must_use]
    pub fn matches(&self, event_room: Option<&RoomName>) -> bool {
        match event_room {
            None => true,
            Some(room) => self.room.as_ref() == Some(room),
        }
    }
}
