//! Records mirrored from backend responses and events.

use serde::{Deserialize, Serialize};

use crate::StatusEvent;

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    pub size_bytes: u64,
    pub mtime_epoch: Option<u64>,
}

/// Result of a capped remote file read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadFileResult {
    pub path: String,
    pub bytes: Vec<u8>,
    /// True when the file was longer than the requested cap.
    pub truncated: bool,
}

/// An event delivered by the backend for one open session.
///
/// The shell subscribes to these and routes them to the pane bound to
/// `session_id`; the runtime never pulls.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A chunk of terminal output bytes, unbounded while the session is open.
    Output { session_id: String, bytes: Vec<u8> },
    /// A connection status change.
    Status {
        session_id: String,
        event: StatusEvent,
    },
}
