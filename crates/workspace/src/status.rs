//! Display-level connection status machine.
//!
//! A pure projection of backend truth: the backend runs the retry loop and
//! reports attempts; this machine only names the states, their default
//! display texts, and which transitions a well-behaved backend produces.
//! Out-of-order reports are still displayed (the backend knows best), just
//! logged as unexpected.

/// Connection state shown in a pane's status bar, independent of what
/// content currently occupies the pane body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneStatus {
    Connecting,
    Connected,
    Reconnecting,
    ReconnectFailed,
    Error,
    Disconnected,
}

impl PaneStatus {
    /// Parse a wire status name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "connecting" => Some(Self::Connecting),
            "connected" => Some(Self::Connected),
            "reconnecting" => Some(Self::Reconnecting),
            "reconnect_failed" => Some(Self::ReconnectFailed),
            "error" => Some(Self::Error),
            "disconnected" => Some(Self::Disconnected),
            _ => None,
        }
    }

    /// Class name for the status dot.
    pub fn dot_class(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::ReconnectFailed => "reconnect_failed",
            Self::Error => "error",
            Self::Disconnected => "disconnected",
        }
    }

    /// Status text used when the backend supplies none.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Reconnecting => "Reconnecting...",
            Self::ReconnectFailed => "Connection lost. Click to reconnect manually.",
            Self::Disconnected => "Disconnected",
            Self::Error => "Error",
        }
    }

    /// Whether the manual reconnect affordance is shown.
    pub fn shows_reconnect(self) -> bool {
        matches!(self, Self::Error | Self::ReconnectFailed)
    }

    /// Terminal for the session's lifetime; only a fresh manual reconnect
    /// request leaves these states.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Disconnected | Self::Error)
    }

    /// Whether a backend-driven transition to `next` is expected.
    ///
    /// Any state may enter `Error` on a fatal report. Leaving a failed
    /// state for `Reconnecting` is the manual-reconnect path.
    pub fn can_transition_to(self, next: Self) -> bool {
        use PaneStatus::*;
        if next == Error {
            return true;
        }
        matches!(
            (self, next),
            (Connecting, Connected)
                | (Connected, Reconnecting)
                | (Connected, Disconnected)
                | (Reconnecting, Connected)
                | (Reconnecting, ReconnectFailed)
                | (ReconnectFailed, Reconnecting)
                | (Error, Reconnecting)
                | (Disconnected, Reconnecting)
        )
    }
}
