//! Location producer state machine.
//!
//! [`LocationTracker`] is the sans-IO core of the browser client's
//! publishing side: the platform shell feeds it connection callbacks and
//! geolocation samples, and it hands back the frames to put on the wire.
//! It never performs IO itself, which keeps the whole state machine
//! testable without a browser or a socket.

use std::time::Duration;

use crate::client::ClientError;
use crate::client::geo::Coordinates;
use crate::domain::{ConnectionId, LocationUpdate, RoomName};
use crate::ws::messages::ClientMessage;

/// Default marker color assigned to a fresh client.
pub const DEFAULT_COLOR: &str = "#3498db";

/// Configuration the shell passes to the platform geolocation watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Request the most accurate fix available (GPS where present).
    pub high_accuracy: bool,
    /// Give up on a single acquisition after this long. Failure is
    /// reported, not retried — the continuous watch supplies the next
    /// sample on its own.
    pub timeout: Duration,
    /// Maximum acceptable age of a cached fix. Zero means never accept
    /// a stale position.
    pub maximum_age: Duration,
}

/// Watch configuration used by the deployed client.
pub const WATCH_OPTIONS: WatchOptions = WatchOptions {
    high_accuracy: true,
    timeout: Duration::from_secs(5),
    maximum_age: Duration::ZERO,
};

/// One sample from the platform geolocation watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// Sampled coordinates.
    pub coords: Coordinates,
    /// Heading in degrees, if the device reports one.
    pub heading: Option<f64>,
}

/// Connection lifecycle phases of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No channel; samples are dropped.
    Disconnected,
    /// Channel handshake in progress; samples are dropped.
    Connecting,
    /// Channel up, join sent, watch not started yet.
    Connected,
    /// Channel up and the geolocation watch is running.
    Tracking,
}

/// Platform screen wake lock.
///
/// Acquired opportunistically to keep the sampling loop alive while the
/// screen is visible; failure is never fatal.
pub trait WakeLock {
    /// Requests the lock.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WakeLock`] when the platform refuses
    /// (unsupported, permission policy, page hidden).
    fn request(&mut self) -> Result<(), ClientError>;
}

/// Wake lock for platforms without one. Every request is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWakeLock;

impl WakeLock for NoWakeLock {
    fn request(&mut self) -> Result<(), ClientError> {
        Err(ClientError::WakeLock("not available on this platform".to_string()))
    }
}

/// The location producer: `Disconnected → Connecting → Connected →
/// Tracking`.
///
/// Samples produced while the channel is down are dropped, never queued;
/// recovery is implicit because the continuous watch keeps sampling.
#[derive(Debug)]
pub struct LocationTracker<W: WakeLock> {
    phase: TrackerPhase,
    room: RoomName,
    self_id: Option<ConnectionId>,
    name: String,
    color: String,
    last_coords: Option<Coordinates>,
    wake_lock: W,
    wake_lock_held: bool,
}

impl<W: WakeLock> LocationTracker<W> {
    /// Creates a tracker for the room selected by the page URL.
    ///
    /// `room_param` is the `?room=` query value; absent or empty falls
    /// back to the default room.
    #[must_use]
    pub fn new(room_param: Option<&str>, wake_lock: W) -> Self {
        let room = match room_param {
            Some(r) if !r.is_empty() => RoomName::new(r),
            _ => RoomName::default_room(),
        };
        Self {
            phase: TrackerPhase::Disconnected,
            room,
            self_id: None,
            name: "Anonymous".to_string(),
            color: DEFAULT_COLOR.to_string(),
            last_coords: None,
            wake_lock,
            wake_lock_held: false,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    /// The room this tracker joins on connect.
    #[must_use]
    pub fn room(&self) -> &RoomName {
        &self.room
    }

    /// The identifier the server assigned, once connected.
    #[must_use]
    pub fn self_id(&self) -> Option<ConnectionId> {
        self.self_id
    }

    /// Current display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Most recent sampled coordinates, if any.
    #[must_use]
    pub fn last_coords(&self) -> Option<Coordinates> {
        self.last_coords
    }

    /// The channel handshake has started.
    pub fn on_connecting(&mut self) {
        self.phase = TrackerPhase::Connecting;
    }

    /// The channel is up and the server announced our identifier.
    ///
    /// Derives the default display name from the id and returns the
    /// `join-room` frame to send immediately, before any samples.
    pub fn on_connected(&mut self, id: ConnectionId) -> ClientMessage {
        self.phase = TrackerPhase::Connected;
        self.self_id = Some(id);
        self.name = format!("User {}", id.short());
        ClientMessage::JoinRoom(self.room.clone())
    }

    /// The shell is starting the geolocation watch.
    ///
    /// Acquires the wake lock opportunistically — refusal is logged and
    /// tracking continues without it. Returns the watch configuration for
    /// the platform geolocation API.
    pub fn start_tracking(&mut self) -> WatchOptions {
        match self.wake_lock.request() {
            Ok(()) => self.wake_lock_held = true,
            Err(err) => tracing::warn!(%err, "wake lock refused, tracking without it"),
        }
        self.phase = TrackerPhase::Tracking;
        WATCH_OPTIONS
    }

    /// One successful sample from the watch.
    ///
    /// Always records the fix locally (distance math needs it even while
    /// offline); returns a `send-location` frame only while the channel
    /// reports itself connected. Missed samples are not buffered.
    pub fn on_position(&mut self, fix: PositionFix) -> Option<ClientMessage> {
        self.last_coords = Some(fix.coords);

        match self.phase {
            TrackerPhase::Connected | TrackerPhase::Tracking => {
                Some(ClientMessage::SendLocation(LocationUpdate {
                    latitude: fix.coords.latitude,
                    longitude: fix.coords.longitude,
                    heading: fix.heading.unwrap_or(0.0),
                    name: self.name.clone(),
                    color: self.color.clone(),
                    room: Some(self.room.clone()),
                }))
            }
            TrackerPhase::Disconnected | TrackerPhase::Connecting => None,
        }
    }

    /// A single acquisition failed (timeout, permission denied).
    ///
    /// Logged only; the watch itself produces the next attempt.
    pub fn on_position_error(&self, error: &str) {
        tracing::warn!(error, "geolocation sample failed");
    }

    /// The channel dropped. Samples are silently dropped until
    /// [`Self::on_connected`] runs again.
    pub fn on_disconnected(&mut self) {
        self.phase = TrackerPhase::Disconnected;
    }

    /// The page became visible again; re-acquire the wake lock if we
    /// held one before the platform released it.
    pub fn on_visibility_regained(&mut self) {
        if self.wake_lock_held {
            if let Err(err) = self.wake_lock.request() {
                tracing::warn!(%err, "wake lock re-acquisition refused");
                self.wake_lock_held = false;
            }
        }
    }
}
