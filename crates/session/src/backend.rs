//! The backend command surface consumed by the runtime.

use async_trait::async_trait;

use crate::{FileEntry, ReadFileResult};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("session not found")]
    SessionNotFound,

    #[error("request failed: {0}")]
    Request(String),
}

/// Commands the runtime may issue against the backend session service.
///
/// Event delivery (output chunks, status changes) is push-based and wired
/// by the shell; this trait covers only request/response and fire-and-forget
/// commands. Implementations must be cheap to share behind an `Arc`.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// List one remote directory, non-recursively.
    async fn list_directory(
        &self,
        session_id: &str,
        path: &str,
    ) -> Result<Vec<FileEntry>, BackendError>;

    /// Read a remote file, capped at `max_bytes` (backend default when None).
    async fn read_file(
        &self,
        session_id: &str,
        path: &str,
        max_bytes: Option<u64>,
    ) -> Result<ReadFileResult, BackendError>;

    /// Ask the backend to re-attempt a failed session. Fire-and-forget:
    /// progress comes back through status events.
    async fn reconnect(&self, session_id: &str) -> Result<(), BackendError>;
}
