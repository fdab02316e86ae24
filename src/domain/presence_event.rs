//! Presence payloads and the internal broadcast event.
//!
//! [`LocationUpdate`] is what a client sends; [`PresenceUpdate`] is the
//! enriched form relayed to peers (sender id attached, room stripped);
//! [`PresenceEvent`] is what travels on the [`super::EventBus`] and carries
//! the routing information the wire payload must not.

use serde::{Deserialize, Serialize};

use super::{ConnectionId, RoomName};
use crate::error::RelayError;

/// One geolocation sample published by a client.
///
/// The optional `room` field lets a client address a room explicitly; it is
/// stripped before the update is re-emitted to peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// Latitude in degrees, range −90..=90.
    pub latitude: f64,
    /// Longitude in degrees, range −180..=180.
    pub longitude: f64,
    /// Heading in degrees; 0 when the device reports none.
    #[serde(default)]
    pub heading: f64,
    /// Display name shown on the marker popup.
    pub name: String,
    /// Display color (CSS color string) for the marker and trail.
    pub color: String,
    /// Target room; falls back to the sender's joined room when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomName>,
}

impl LocationUpdate {
    /// Validates the coordinate fields.
    ///
    /// The original deployments relayed payloads unchecked; rejecting
    /// out-of-range or non-finite coordinates here keeps garbage off the
    /// wire without touching the relay path.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidPayload`] when a coordinate is not a
    /// finite number in its valid degree range.
    pub fn validate(&self) -> Result<(), RelayError> {
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(RelayError::InvalidPayload(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || self.longitude.abs() > 180.0 {
            return Err(RelayError::InvalidPayload(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        if !self.heading.is_finite() {
            return Err(RelayError::InvalidPayload("heading is not finite".to_string()));
        }
        Ok(())
    }
}

/// A [`LocationUpdate`] enriched with the sender's identity.
///
/// This is the exact shape delivered to clients: the `room` field is gone
/// by construction, the `id` field added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceUpdate {
    /// Identifier of the connection that produced the sample.
    pub id: ConnectionId,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Heading in degrees.
    pub heading: f64,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: String,
}

impl PresenceUpdate {
    /// Builds the enriched payload from a sample, attaching the sender id
    /// and dropping the room field.
    #[must_use]
    pub fn enrich(sender: ConnectionId, update: LocationUpdate) -> Self {
        Self {
            id: sender,
            latitude: update.latitude,
            longitude: update.longitude,
            heading: update.heading,
            name: update.name,
            color: update.color,
        }
    }
}

/// Internal event broadcast to every connection task.
///
/// The `room` on [`PresenceEvent::Location`] routes fan-out: `None` means
/// deliver to every connection, `Some(r)` only to current members of `r`.
/// Departures are always unscoped so clients can clean up peers regardless
/// of room membership.
#[derive(Debug, Clone)]
pub enum PresenceEvent {
    /// A member published a location sample.
    Location {
        /// Target room; `None` broadcasts to everyone.
        room: Option<RoomName>,
        /// Enriched payload to put on the wire.
        update: PresenceUpdate,
    },
    /// A connection closed.
    Departed {
        /// Identifier of the departed connection.
        id: ConnectionId,
    },
}

impl PresenceEvent {
    /// Returns the room this event is scoped to, if any.
    #[must_use]
    pub fn room(&self) -> Option<&RoomName> {
        match self {
            Self::Location { room, .. } => room.as_ref(),
            Self::Departed { .. } => None,
        }
    }
}
