//! Presence service: resolves broadcast targets and emits events.

use std::sync::Arc;

use crate::domain::{
    ConnectionId, EventBus, LocationUpdate, PresenceEvent, PresenceUpdate, RoomName, RoomRegistry,
};
use crate::error::RelayError;

/// Fan-out policy for location updates.
///
/// The observed deployments split between the two behaviors, so the scope
/// is an explicit constructor-time switch rather than something inferred
/// from payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastScope {
    /// Updates are delivered only to members of the resolved room.
    Rooms,
    /// Every update goes to every connected client.
    Global,
}

/// Orchestration layer for presence traffic.
///
/// Stateless coordinator: owns references to [`RoomRegistry`] for
/// membership and [`EventBus`] for fan-out. Every handler follows the
/// pattern: validate → resolve targets → publish → return. Publishing is
/// fire-and-forget; nothing on this path awaits per-recipient delivery.
#[derive(Debug, Clone)]
pub struct PresenceService {
    registry: Arc<RoomRegistry>,
    event_bus: EventBus,
    scope: BroadcastScope,
}

impl PresenceService {
    /// Creates a new `PresenceService`.
    #[must_use]
    pub fn new(registry: Arc<RoomRegistry>, event_bus: EventBus, scope: BroadcastScope) -> Self {
        Self {
            registry,
            event_bus,
            scope,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`RoomRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Returns the configured fan-out policy.
    #[must_use]
    pub fn scope(&self) -> BroadcastScope {
        self.scope
    }

    /// Records `conn` as a member of `room` (last join wins).
    pub async fn handle_join(&self, conn: ConnectionId, room: RoomName) {
        tracing::debug!(%conn, %room, "join-room");
        self.registry.join(conn, room).await;
    }

    /// Relays one location sample from `conn` to its target audience.
    ///
    /// The payload's `room` field is stripped; the target room is the
    /// payload room when present and non-empty, otherwise the sender's
    /// registered room. A sender with neither broadcasts to everyone, as
    /// does every sender under [`BroadcastScope::Global`]. The sender is
    /// always part of the audience (self-echo).
    ///
    /// Returns the number of connection tasks the event reached.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidPayload`] when the sample fails
    /// coordinate validation; nothing is published in that case.
    pub async fn handle_location(
        &self,
        conn: ConnectionId,
        mut update: LocationUpdate,
    ) -> Result<usize, RelayError> {
        update.validate()?;

        let payload_room = update.room.take().filter(|r| !r.is_empty());
        let target = match self.scope {
            BroadcastScope::Global => None,
            BroadcastScope::Rooms => match payload_room {
                Some(room) => Some(room),
                None => self.registry.room_of(conn).await,
            },
        };

        let event = PresenceEvent::Location {
            room: target,
            update: PresenceUpdate::enrich(conn, update),
        };
        Ok(self.event_bus.publish(event))
    }

    /// Removes `conn`'s membership and notifies all remaining connections.
    ///
    /// The departure is broadcast globally regardless of room, which keeps
    /// client-side cleanup independent of membership state. Fire-and-forget,
    /// no retry.
    pub async fn handle_disconnect(&self, conn: ConnectionId) {
        self.registry.disconnect(conn).await;
        let reached = self.event_bus.publish(PresenceEvent::Departed { id: conn });
        tracing::debug!(%conn, reached, "user disconnected");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_service(scope: BroadcastScope) -> PresenceService {
        PresenceService::new(Arc::new(RoomRegistry::new()), EventBus::new(16), scope)
    }

    fn sample(room: Option<&str>) -> LocationUpdate {
        LocationUpdate {
            latitude: 10.0,
            longitude: 20.0,
            heading: 0.0,
            name: "A".to_string(),
            color: "#111".to_string(),
            room: room.map(RoomName::new),
        }
    }

    #[tokio::test]
    async fn location_event_targets_payload_room() {
        let service = make_service(BroadcastScope::Rooms);
        let mut rx = service.event_bus().subscribe();
        let conn = ConnectionId::new();

        let result = service.handle_location(conn, sample(Some("r1"))).await;
        assert!(result.is_ok());

        let Ok(PresenceEvent::Location { room, update }) = rx.recv().await else {
            panic!("expected a location event");
        };
        assert_eq!(room, Some(RoomName::new("r1")));
        assert_eq!(update.id, conn);
        assert_eq!(update.latitude, 10.0);
    }

    #[tokio::test]
    async fn location_falls_back_to_joined_room() {
        let service = make_service(BroadcastScope::Rooms);
        let mut rx = service.event_bus().subscribe();
        let conn = ConnectionId::new();

        service.handle_join(conn, RoomName::new("r2")).await;
        let _ = service.handle_location(conn, sample(None)).await;

        let Ok(PresenceEvent::Location { room, .. }) = rx.recv().await else {
            panic!("expected a location event");
        };
        assert_eq!(room, Some(RoomName::new("r2")));
    }

    #[tokio::test]
    async fn empty_payload_room_is_ignored() {
        let service = make_service(BroadcastScope::Rooms);
        let mut rx = service.event_bus().subscribe();
        let conn = ConnectionId::new();

        service.handle_join(conn, RoomName::new("r2")).await;
        let _ = service.handle_location(conn, sample(Some(""))).await;

        let Ok(PresenceEvent::Location { room, .. }) = rx.recv().await else {
            panic!("expected a location event");
        };
        assert_eq!(room, Some(RoomName::new("r2")));
    }

    #[tokio::test]
    async fn unjoined_sender_broadcasts_to_everyone() {
        let service = make_service(BroadcastScope::Rooms);
        let mut rx = service.event_bus().subscribe();

        let _ = service
            .handle_location(ConnectionId::new(), sample(None))
            .await;

        let Ok(PresenceEvent::Location { room, .. }) = rx.recv().await else {
            panic!("expected a location event");
        };
        assert_eq!(room, None);
    }

    #[tokio::test]
    async fn global_scope_ignores_rooms() {
        let service = make_service(BroadcastScope::Global);
        let mut rx = service.event_bus().subscribe();
        let conn = ConnectionId::new();

        service.handle_join(conn, RoomName::new("r1")).await;
        let _ = service.handle_location(conn, sample(Some("r1"))).await;

        let Ok(PresenceEvent::Location { room, .. }) = rx.recv().await else {
            panic!("expected a location event");
        };
        assert_eq!(room, None);
    }

    #[tokio::test]
    async fn invalid_payload_publishes_nothing() {
        let service = make_service(BroadcastScope::Rooms);
        let mut rx = service.event_bus().subscribe();

        let mut bad = sample(None);
        bad.latitude = 200.0;
        let result = service.handle_location(ConnectionId::new(), bad).await;
        assert!(result.is_err());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_clears_membership_and_broadcasts() {
        let service = make_service(BroadcastScope::Rooms);
        let mut rx = service.event_bus().subscribe();
        let conn = ConnectionId::new();

        service.handle_join(conn, RoomName::new("r1")).await;
        service.handle_disconnect(conn).await;

        assert_eq!(service.registry().room_of(conn).await, None);
        let Ok(PresenceEvent::Departed { id }) = rx.recv().await else {
            panic!("expected a departure event");
        };
        assert_eq!(id, conn);
    }
}
