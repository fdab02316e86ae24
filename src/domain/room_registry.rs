//! Room membership storage.
//!
//! [`RoomRegistry`] maps room names to the set of member connections and
//! each connection to its current room. Both directions live under one
//! [`tokio::sync::RwLock`] so a join can atomically replace a prior
//! membership.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use super::{ConnectionId, RoomName};

#[derive(Debug, Default)]
struct Tables {
    /// Room name → current member set. Empty rooms are removed eagerly.
    rooms: HashMap<RoomName, HashSet<ConnectionId>>,
    /// Connection → the room it last joined. At most one entry per
    /// connection (last join wins).
    membership: HashMap<ConnectionId, RoomName>,
}

/// Process-wide room membership table.
///
/// Injected as an `Arc` into the presence service rather than living as a
/// module-level singleton, so tests can run isolated registries side by
/// side. Rooms are created implicitly on first join and garbage-collected
/// when their last member leaves; unknown room names are never an error.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    tables: RwLock<Tables>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `conn` as a member of `room`, replacing any prior
    /// membership. A connection is in at most one room at a time.
    pub async fn join(&self, conn: ConnectionId, room: RoomName) {
        let mut tables = self.tables.write().await;
        if let Some(previous) = tables.membership.insert(conn, room.clone()) {
            if let Some(members) = tables.rooms.get_mut(&previous) {
                members.remove(&conn);
                if members.is_empty() {
                    tables.rooms.remove(&previous);
                }
            }
        }
        tables.rooms.entry(room).or_default().insert(conn);
    }

    /// Returns the current member set of `room` (empty for unknown rooms).
    pub async fn members_of(&self, room: &RoomName) -> HashSet<ConnectionId> {
        let tables = self.tables.read().await;
        tables.rooms.get(room).cloned().unwrap_or_default()
    }

    /// Returns the room `conn` last joined, if any.
    pub async fn room_of(&self, conn: ConnectionId) -> Option<RoomName> {
        let tables = self.tables.read().await;
        tables.membership.get(&conn).cloned()
    }

    /// Removes all membership state for a closed connection.
    ///
    /// After this returns, `members_of` can never surface the identifier
    /// again; delivery paths that already hold a stale snapshot are cut off
    /// by the connection's dead broadcast receiver instead.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let mut tables = self.tables.write().await;
        if let Some(room) = tables.membership.remove(&conn) {
            if let Some(members) = tables.rooms.get_mut(&room) {
                members.remove(&conn);
                if members.is_empty() {
                    tables.rooms.remove(&room);
                }
            }
        }
    }

    /// Returns the number of rooms with at least one member.
    pub async fn room_count(&self) -> usize {
        self.tables.read().await.rooms.len()
    }
}
