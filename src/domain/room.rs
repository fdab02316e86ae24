//! Room names.
//!
//! A room is a named partition of connections used to scope broadcast.
//! Rooms are created on demand when the first member joins and carry no
//! state beyond their member set in [`super::RoomRegistry`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the room clients land in when none is selected.
pub const DEFAULT_ROOM: &str = "default";

/// Opaque, caller-supplied room identifier.
///
/// Any non-empty string is a valid room name; unknown names are not an
/// error, the room simply starts existing when joined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    /// Creates a room name from any string-like value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the default room (`"default"`).
    #[must_use]
    pub fn default_room() -> Self {
        Self(DEFAULT_ROOM.to_string())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name is the empty string.
    ///
    /// Empty names come from clients that send a blank `room` field; they
    /// are treated as "no room selected" rather than a real room.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomName {
    fn from(s: String) -> Self {
        Self(s)
    }
}
