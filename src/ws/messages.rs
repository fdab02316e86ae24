//! WebSocket wire protocol: named events with structured payloads.
//!
//! Every frame is a JSON object `{"event": ..., "data": ...}`. The event
//! names mirror the deployed protocol: `join-room` and `send-location`
//! inbound, `receive-location` and `user-disconnected` outbound. The
//! `connected` frame is the one addition: it hands the client its
//! server-assigned identifier so it can recognize its own echo.

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, LocationUpdate, PresenceUpdate, RoomName};
use crate::error::RelayError;

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Join a named room, replacing any prior membership.
    JoinRoom(RoomName),
    /// Publish one geolocation sample.
    SendLocation(LocationUpdate),
}

/// Frames the server sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First frame on every connection: the client's own identifier.
    Connected {
        /// Server-assigned connection identifier.
        id: ConnectionId,
    },
    /// A peer (or the client itself — self-echo) published a location.
    ReceiveLocation(PresenceUpdate),
    /// A peer's connection closed; remove its marker and trail.
    UserDisconnected(ConnectionId),
    /// A client frame was rejected. The connection stays open.
    Error {
        /// Numeric error code (see [`RelayError::error_code`]).
        code: u32,
        /// Human-readable message.
        message: String,
    },
}

impl ServerMessage {
    /// Serializes the frame to JSON, logging instead of failing.
    ///
    /// Serialization of these types cannot realistically fail; a `None`
    /// here means a frame is skipped, never a broken connection.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::error!(%err, "failed to serialize server frame");
                None
            }
        }
    }
}

impl From<&RelayError> for ServerMessage {
    fn from(err: &RelayError) -> Self {
        Self::Error {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}
