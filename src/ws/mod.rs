//! WebSocket layer: the transport channel of the relay.
//!
//! The endpoint at `/ws` carries named JSON events in both directions:
//! joins and location samples in, presence updates and departures out.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod room_filter;
