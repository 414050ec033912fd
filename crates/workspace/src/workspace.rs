//! Workspace controller and pane runtime.
//!
//! Owns every per-pane resource: rendering surfaces, output buffers, status
//! bar models, content elements, and refresh timers. The surrounding shell
//! creates one [`Workspace`] per active grid, routes backend events into it,
//! and renders whatever the pane models expose. Nothing here survives
//! `destroy`; there is no process-wide state.

mod controller;
mod markdown;
mod pane;
mod status;

pub use controller::{Tunables, Workspace, WorkspaceDeps};
pub use markdown::{refresh_view, MarkdownBody, MarkdownRenderer, MarkdownView};
pub use pane::{ContentMode, Pane, PaneContent, StatusBar, EMPTY_PANE_TEXT};
pub use status::PaneStatus;
