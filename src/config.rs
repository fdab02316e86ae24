//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), with defaults applied per key.

use std::net::SocketAddr;

use crate::service::BroadcastScope;

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3001`).
    pub listen_addr: SocketAddr,

    /// Whether broadcasts are partitioned by room or sent to everyone.
    pub broadcast_scope: BroadcastScope,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`], or if `BROADCAST_SCOPE` is set to anything other
    /// than `rooms` or `global` — a typo here would silently change
    /// fan-out semantics, so startup refuses it instead.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3001".to_string())
            .parse()?;

        let broadcast_scope = parse_scope(std::env::var("BROADCAST_SCOPE").ok().as_deref())?;

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024);

        Ok(Self {
            listen_addr,
            broadcast_scope,
            event_bus_capacity,
        })
    }
}

/// Parses the `BROADCAST_SCOPE` value, case-insensitively. Missing means
/// the default (`Rooms`); anything other than `rooms`/`global` is an error.
fn parse_scope(value: Option<&str>) -> Result<BroadcastScope, String> {
    match value {
        None => Ok(BroadcastScope::Rooms),
        Some(v) if v.eq_ignore_ascii_case("rooms") => Ok(BroadcastScope::Rooms),
        Some(v) if v.eq_ignore_ascii_case("global") => Ok(BroadcastScope::Global),
        Some(v) => Err(format!(
            "unrecognized BROADCAST_SCOPE {v:?}; expected \"rooms\" or \"global\""
        )),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
