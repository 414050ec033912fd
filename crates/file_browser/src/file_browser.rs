//! Session-scoped remote file browser.
//!
//! A lazily-loaded directory tree over the backend's listing API. Nodes load
//! once on first expand and keep their listing until an explicit refresh;
//! a root-scoped sequence counter discards listings that resolve after a
//! newer root load superseded them (a slow response from an old session must
//! never overwrite a newer one).
//!
//! Strictly read-only: selecting a markdown file hands off to the viewer,
//! selecting anything else raises a notice through the toast callback.

mod browser;
mod format;
mod tree;

pub use browser::{BrowserView, FileBrowser, FileRow, OpenMarkdownFn, ToastFn, ToastKind};
pub use format::{format_bytes, format_mtime};
pub use tree::{FileNode, FileTree, LoadState, NodeId};
