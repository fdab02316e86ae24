//! # waypoint-relay
//!
//! WebSocket relay for room-scoped real-time location sharing.
//!
//! Clients join a named room, continuously publish their geolocation, and
//! receive the positions of other room members with low latency. The
//! crate contains both the server and the sans-IO client core; map tiles,
//! geocoding, and turn-by-turn routing are external collaborators behind
//! narrow interfaces.
//!
//! ## Architecture
//!
//! ```text
//! Client shell (browser / test harness)
//!     │  LocationTracker ──► send-location        (client/)
//!     │  PresenceRenderer ◄── receive-location
//!     │
//! WebSocket /ws                                    (ws/)
//!     │
//!     ├── PresenceService: target resolution       (service/)
//!     ├── EventBus: fan-out                        (domain/)
//!     └── RoomRegistry: membership                 (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
