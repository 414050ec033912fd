//! In-process demo backend.
//!
//! Serves a small fixed file tree and canned terminal output so the runtime
//! can be driven end to end without a network or remote processes. Doubles
//! as the reference `SessionBackend` implementation for manual testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use session::{BackendError, FileEntry, ReadFileResult, SessionBackend};
use std::sync::Arc;
use uuid::Uuid;

const DEMO_MTIME: u64 = 1_722_470_400; // 2024-08-01

pub struct ScriptedBackend {
    sessions: Mutex<Vec<String>>,
    listings: FxHashMap<String, Vec<FileEntry>>,
    files: FxHashMap<String, String>,
}

impl ScriptedBackend {
    /// A backend serving `/srv/demo` with a source directory and two
    /// markdown files.
    pub fn demo() -> Arc<Self> {
        let mut listings = FxHashMap::default();
        listings.insert(
            "/srv/demo".to_string(),
            vec![
                dir_entry("/srv/demo/src", "src"),
                file_entry("/srv/demo/README.md", "README.md", 420),
                file_entry("/srv/demo/TODO.md", "TODO.md", 96),
                file_entry("/srv/demo/build.log", "build.log", 70_412),
            ],
        );
        listings.insert(
            "/srv/demo/src".to_string(),
            vec![
                file_entry("/srv/demo/src/main.rs", "main.rs", 2_048),
                file_entry("/srv/demo/src/lib.rs", "lib.rs", 1_024),
            ],
        );

        let mut files = FxHashMap::default();
        files.insert(
            "/srv/demo/README.md".to_string(),
            "# demo\n\nA scripted workspace session.\n".to_string(),
        );
        files.insert(
            "/srv/demo/TODO.md".to_string(),
            "- [ ] nothing, this is a demo\n".to_string(),
        );

        Arc::new(Self {
            sessions: Mutex::new(Vec::new()),
            listings,
            files,
        })
    }

    /// Mint a session id, as the real backend's activation response would.
    pub fn open_session(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions.lock().push(session_id.clone());
        session_id
    }

    /// Canned output chunks for one pane's stream.
    pub fn output_script(pane_index: usize) -> Vec<Vec<u8>> {
        vec![
            format!("\x1b[1mgridmux demo pane {pane_index}\x1b[0m\r\n").into_bytes(),
            b"$ cargo build\r\n".to_vec(),
            b"   Compiling demo v0.1.0\r\n".to_vec(),
            b"    Finished dev profile in 0.42s\r\n".to_vec(),
            b"$ ".to_vec(),
        ]
    }

    fn check_session(&self, session_id: &str) -> Result<(), BackendError> {
        if self.sessions.lock().iter().any(|s| s == session_id) {
            Ok(())
        } else {
            Err(BackendError::SessionNotFound)
        }
    }
}

#[async_trait]
impl SessionBackend for ScriptedBackend {
    async fn list_directory(
        &self,
        session_id: &str,
        path: &str,
    ) -> Result<Vec<FileEntry>, BackendError> {
        self.check_session(session_id)?;
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::Request(format!("no such directory: {path}")))
    }

    async fn read_file(
        &self,
        session_id: &str,
        path: &str,
        max_bytes: Option<u64>,
    ) -> Result<ReadFileResult, BackendError> {
        self.check_session(session_id)?;
        let content = self
            .files
            .get(path)
            .ok_or_else(|| BackendError::Request(format!("no such file: {path}")))?;

        let mut bytes = content.clone().into_bytes();
        let limit = max_bytes.unwrap_or(settings::constants::session::MAX_READ_BYTES) as usize;
        let truncated = bytes.len() > limit;
        bytes.truncate(limit);
        Ok(ReadFileResult {
            path: path.to_string(),
            bytes,
            truncated,
        })
    }

    async fn reconnect(&self, session_id: &str) -> Result<(), BackendError> {
        self.check_session(session_id)?;
        tracing::info!("scripted backend: reconnect requested for {session_id}");
        Ok(())
    }
}

fn dir_entry(path: &str, name: &str) -> FileEntry {
    FileEntry {
        path: path.to_string(),
        name: name.to_string(),
        is_dir: true,
        size_bytes: 0,
        mtime_epoch: Some(DEMO_MTIME),
    }
}

fn file_entry(path: &str, name: &str, size_bytes: u64) -> FileEntry {
    FileEntry {
        path: path.to_string(),
        name: name.to_string(),
        is_dir: false,
        size_bytes,
        mtime_epoch: Some(DEMO_MTIME),
    }
}
