//! Domain layer: core types, room membership, and event system.
//!
//! This module contains the server-side domain model: connection identity,
//! room names and the membership registry, the wire payloads for presence,
//! and the event bus that fans updates out to connection tasks.

pub mod connection_id;
pub mod event_bus;
pub mod presence_event;
pub mod room;
pub mod room_registry;

pub use connection_id::ConnectionId;
pub use event_bus::EventBus;
pub use presence_event::{LocationUpdate, PresenceEvent, PresenceUpdate};
pub use room::{DEFAULT_ROOM, RoomName};
pub use room_registry::RoomRegistry;
