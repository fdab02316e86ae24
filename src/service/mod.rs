//! Service layer: presence orchestration.
//!
//! [`PresenceService`] implements the broadcaster: it resolves where each
//! location sample should go and emits events through the
//! [`crate::domain::EventBus`].

pub mod presence_service;

pub use presence_service::{BroadcastScope, PresenceService};
