//! Wire shape of per-session status events.
//!
//! The backend emits either a bare status name (`"connected"`) or a
//! structured payload carrying an error message or reconnect counters.
//! This module only normalizes the wire shape; mapping onto the display
//! state machine happens in the workspace crate.

use serde::Deserialize;

/// A status event as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StatusEvent {
    /// Bare status name, e.g. `"connecting"`.
    Name(String),
    /// Structured payload.
    Payload {
        status: String,
        /// Human-readable error detail, present for fatal reports.
        #[serde(default)]
        message: Option<String>,
        /// Current retry attempt, reported by the backend's own retry loop.
        #[serde(default)]
        attempt: Option<u32>,
        /// Maximum retry attempts.
        #[serde(default)]
        max: Option<u32>,
    },
}

impl StatusEvent {
    /// The status name, however the event was shaped.
    pub fn status_name(&self) -> &str {
        match self {
            StatusEvent::Name(name) => name,
            StatusEvent::Payload { status, .. } => status,
        }
    }

    /// Display text carried by the event, if any.
    ///
    /// An explicit message wins; otherwise reconnect counters render as
    /// `Reconnecting... (attempt/max)`. Bare names carry no text and let
    /// the per-status default apply.
    pub fn display_text(&self) -> Option<String> {
        match self {
            StatusEvent::Name(_) => None,
            StatusEvent::Payload {
                message: Some(message),
                ..
            } => Some(message.clone()),
            StatusEvent::Payload {
                attempt: Some(attempt),
                max: Some(max),
                ..
            } => Some(format!("Reconnecting... ({attempt}/{max})")),
            StatusEvent::Payload { .. } => None,
        }
    }
}
