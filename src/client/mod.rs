//! Client core: the browser-side state machines, sans IO.
//!
//! Everything a platform shell (WASM frontend, native app, test harness)
//! needs to participate in a room: the location producer
//! ([`tracker::LocationTracker`]) and the presence renderer
//! ([`renderer::PresenceRenderer`]). The shell owns the actual WebSocket,
//! geolocation API, and map library; this module owns the decisions.

pub mod geo;
pub mod renderer;
pub mod tracker;

pub use geo::Coordinates;
pub use renderer::{MapSurface, PresenceRenderer, RouteRequest};
pub use tracker::{LocationTracker, PositionFix, TrackerPhase, WakeLock};

/// Client-side errors.
///
/// Wake lock refusals are logged and tracking continues; an unknown self
/// position on a route request is surfaced to the user directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// A route was requested before any self position was known.
    #[error("current position not yet known")]
    SelfPositionUnknown,

    /// The platform refused the screen wake lock.
    #[error("wake lock unavailable: {0}")]
    WakeLock(String),
}
