//! The browser itself: context handling, lazy loads, and row projection.

use parking_lot::Mutex;
use session::{BackendError, SessionBackend};
use std::sync::Arc;

use crate::format::{format_bytes, format_mtime};
use crate::tree::{FileTree, LoadState, NodeId};

/// Invoked when the user selects a `.md` file.
pub type OpenMarkdownFn = Box<dyn Fn(&str) + Send + Sync>;

/// Caller-supplied notification sink; listing failures land here instead of
/// propagating.
pub type ToastFn = Box<dyn Fn(&str, ToastKind) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// One row of the rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRow {
    pub path: String,
    pub name: String,
    pub depth: usize,
    /// Left padding in pixels: base + per-depth indent.
    pub indent_px: f32,
    pub is_dir: bool,
    pub expanded: bool,
    pub selected: bool,
    /// Expand/collapse glyph for directories, a bullet for files.
    pub glyph: &'static str,
    /// Size and mtime for files, a loading label for fetching directories.
    pub meta: String,
}

/// What the pane body should show.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserView {
    Empty { message: String },
    Tree { rows: Vec<FileRow> },
}

struct BrowserState {
    session_id: Option<String>,
    root_path: Option<String>,
    tree: FileTree,
    selected: Option<String>,
    /// Bumped on every root load request; in-flight listings that no longer
    /// match are discarded on completion.
    load_seq: u64,
}

struct Shared {
    backend: Arc<dyn SessionBackend>,
    state: Mutex<BrowserState>,
    on_open_markdown: OpenMarkdownFn,
    toast: ToastFn,
}

/// Cheaply clonable handle; clones share one tree. The owning pane keeps
/// one clone in its refresh timer and drops both on detach.
pub struct FileBrowser {
    shared: Arc<Shared>,
}

impl Clone for FileBrowser {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl FileBrowser {
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        on_open_markdown: OpenMarkdownFn,
        toast: ToastFn,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                state: Mutex::new(BrowserState {
                    session_id: None,
                    root_path: None,
                    tree: FileTree::new(),
                    selected: None,
                    load_seq: 0,
                }),
                on_open_markdown,
                toast,
            }),
        }
    }

    /// Point the browser at a session and root directory.
    ///
    /// A missing half clears the tree to the empty state. An actual change
    /// resets selection and the root node; returns true in that case and the
    /// caller triggers a root load. Re-applying the same context is a no-op
    /// so poll ticks don't cause redundant reloads.
    pub fn set_context(&self, session_id: Option<&str>, root_path: Option<&str>) -> bool {
        let mut state = self.shared.state.lock();
        let (Some(session_id), Some(root_path)) = (session_id, root_path) else {
            state.session_id = None;
            state.root_path = None;
            state.selected = None;
            state.tree.clear();
            return false;
        };

        let changed = state.session_id.as_deref() != Some(session_id)
            || state.root_path.as_deref() != Some(root_path);
        state.session_id = Some(session_id.to_string());
        state.root_path = Some(root_path.to_string());
        if changed {
            state.selected = None;
            state.tree.set_root(root_path);
        }
        changed
    }

    /// Reload the root's direct listing. Children that already loaded keep
    /// their cached state; only the root's `Loaded` flag is forced off.
    pub async fn refresh(&self) {
        let (session_id, path, seq) = {
            let mut state = self.shared.state.lock();
            let (Some(session_id), Some(root)) = (state.session_id.clone(), state.tree.root())
            else {
                return;
            };
            if state.tree.node(root).state == LoadState::Loading {
                return;
            }
            state.load_seq += 1;
            let seq = state.load_seq;
            let node = state.tree.node_mut(root);
            node.state = LoadState::Loading;
            (session_id, node.path.clone(), seq)
        };

        let result = self.shared.backend.list_directory(&session_id, &path).await;
        self.apply_listing(&path, seq, result);
    }

    /// Expand or collapse a directory; the first expand lazy-loads it.
    pub async fn toggle_dir(&self, path: &str) {
        let load_needed = {
            let mut state = self.shared.state.lock();
            let Some(id) = state.tree.find(path) else {
                return;
            };
            let node = state.tree.node_mut(id);
            if !node.is_dir {
                return;
            }
            node.expanded = !node.expanded;
            node.expanded && node.state == LoadState::Unloaded
        };
        if load_needed {
            self.load_dir(path).await;
        }
    }

    /// Select a file. Markdown hands off to the viewer callback; everything
    /// else raises the read-only notice.
    pub fn select_file(&self, path: &str) {
        self.shared.state.lock().selected = Some(path.to_string());
        if path.to_lowercase().ends_with(".md") {
            (self.shared.on_open_markdown)(path);
            return;
        }
        (self.shared.toast)(
            "Read-only file browser. Use terminal to edit files.",
            ToastKind::Error,
        );
    }

    pub fn selected_path(&self) -> Option<String> {
        self.shared.state.lock().selected.clone()
    }

    /// Project the tree into renderable rows.
    pub fn view(&self) -> BrowserView {
        let state = self.shared.state.lock();
        let Some(root) = state.tree.root() else {
            return BrowserView::Empty {
                message: "No active session".to_string(),
            };
        };

        let mut rows = Vec::new();
        push_rows(&state.tree, state.selected.as_deref(), root, 0, &mut rows);
        BrowserView::Tree { rows }
    }

    /// Load one directory's listing with the duplicate-fetch guard.
    async fn load_dir(&self, path: &str) {
        let (session_id, seq) = {
            let mut state = self.shared.state.lock();
            let Some(session_id) = state.session_id.clone() else {
                return;
            };
            let Some(id) = state.tree.find(path) else {
                return;
            };
            let node = state.tree.node_mut(id);
            if node.state != LoadState::Unloaded {
                // Already loading or loaded; nothing to do.
                return;
            }
            node.state = LoadState::Loading;
            (session_id, state.load_seq)
        };

        let result = self.shared.backend.list_directory(&session_id, path).await;
        self.apply_listing(path, seq, result);
    }

    /// Apply a completed listing, unless a newer root load superseded it.
    fn apply_listing(
        &self,
        path: &str,
        seq: u64,
        result: Result<Vec<session::FileEntry>, BackendError>,
    ) {
        let toast_message = {
            let mut state = self.shared.state.lock();
            let node_id = state.tree.find(path);

            if seq != state.load_seq {
                // Stale: a newer root load owns the tree now. Reset the
                // loading marker if the node survived, drop the data.
                if let Some(id) = node_id {
                    let node = state.tree.node_mut(id);
                    if node.state == LoadState::Loading {
                        node.state = LoadState::Unloaded;
                    }
                }
                return;
            }

            let Some(id) = node_id else {
                return;
            };
            match result {
                Ok(entries) => {
                    state.tree.set_children(id, entries);
                    None
                }
                Err(error) => {
                    state.tree.node_mut(id).state = LoadState::Unloaded;
                    Some(format!("Failed to list directory: {error}"))
                }
            }
        };

        if let Some(message) = toast_message {
            tracing::warn!("{message}");
            (self.shared.toast)(&message, ToastKind::Error);
        }
    }
}

fn push_rows(
    tree: &FileTree,
    selected: Option<&str>,
    id: NodeId,
    depth: usize,
    rows: &mut Vec<FileRow>,
) {
    use settings::constants::file_browser::{BASE_INDENT, INDENT_PER_DEPTH};

    let node = tree.node(id);
    let meta = if node.is_dir {
        if node.state == LoadState::Loading {
            "loading...".to_string()
        } else {
            String::new()
        }
    } else {
        let size = format_bytes(node.size_bytes);
        match node.mtime_epoch.and_then(format_mtime) {
            Some(mtime) => format!("{size} · {mtime}"),
            None => size,
        }
    };

    rows.push(FileRow {
        path: node.path.clone(),
        name: node.name.clone(),
        depth,
        indent_px: BASE_INDENT + depth as f32 * INDENT_PER_DEPTH,
        is_dir: node.is_dir,
        expanded: node.expanded,
        selected: selected == Some(node.path.as_str()),
        glyph: if node.is_dir {
            if node.expanded {
                "▾"
            } else {
                "▸"
            }
        } else {
            "•"
        },
        meta,
    });

    if node.is_dir && node.expanded {
        for child in node.children() {
            push_rows(tree, selected, *child, depth + 1, rows);
        }
    }
}
