//! Per-pane state.
//!
//! A pane exclusively owns its rendering surface, output buffer, status bar
//! model, content state, and timers; no other component retains them past a
//! detach. Remembered state that must survive content-mode switches (the
//! last markdown path, the file-browser root) lives directly on the record.

use file_browser::FileBrowser;
use parking_lot::Mutex;
use std::sync::Arc;
use terminal::{OutputBuffer, SharedSurface};
use util::{Debouncer, TaskGuard};

use crate::markdown::MarkdownView;
use crate::status::PaneStatus;

/// Body text of a cell with no connection slot.
pub const EMPTY_PANE_TEXT: &str = "No connection";

/// Which capability occupies the pane body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    #[default]
    Terminal,
    FileBrowser,
    Markdown,
}

/// Status bar display model: dot + host label + text + mode selector +
/// reconnect control.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar {
    /// Dot class: the lowercased status name, preserved even for names the
    /// state machine does not know.
    pub dot_class: String,
    /// Parsed status when the name was recognized.
    pub status: Option<PaneStatus>,
    pub status_text: String,
    pub host_label: String,
    pub reconnect_visible: bool,
    /// Current selection of the content-mode switcher.
    pub content_mode: ContentMode,
}

impl StatusBar {
    pub fn new(host_label: String) -> Self {
        Self {
            dot_class: PaneStatus::Connecting.dot_class().to_string(),
            status: Some(PaneStatus::Connecting),
            status_text: String::new(),
            host_label,
            reconnect_visible: false,
            content_mode: ContentMode::Terminal,
        }
    }
}

/// Mode-specific content state. The refresh guards abort their timers on
/// drop, so replacing the content is what cancels the previous mode's timer.
pub enum PaneContent {
    /// Placeholder cell or detached shell.
    Empty,
    Terminal,
    FileBrowser {
        browser: FileBrowser,
        _refresh: TaskGuard,
    },
    Markdown {
        view: Arc<Mutex<MarkdownView>>,
        _refresh: TaskGuard,
    },
}

impl PaneContent {
    pub fn mode(&self) -> Option<ContentMode> {
        match self {
            PaneContent::Empty => None,
            PaneContent::Terminal => Some(ContentMode::Terminal),
            PaneContent::FileBrowser { .. } => Some(ContentMode::FileBrowser),
            PaneContent::Markdown { .. } => Some(ContentMode::Markdown),
        }
    }
}

/// One cell of the grid.
pub struct Pane {
    /// Row-major position; immutable for the grid's lifetime.
    pub index: usize,
    pub(crate) session_id: Option<String>,
    pub(crate) host_label: String,
    /// Panes beyond the connection count are inert placeholders.
    pub(crate) interactive: bool,
    /// Root directory for the file-browser mode.
    pub(crate) file_root: Option<String>,
    /// Remembered across content-mode switches so returning to markdown
    /// mode redisplays the last file.
    pub(crate) markdown_path: Option<String>,
    pub(crate) surface: Option<SharedSurface>,
    pub(crate) output_buffer: Option<OutputBuffer>,
    pub(crate) status_bar: Option<StatusBar>,
    pub(crate) resize_debounce: Option<Debouncer>,
    pub(crate) content: PaneContent,
    /// Last known surface size in (cols, rows).
    pub(crate) last_size: (u16, u16),
}

impl Pane {
    pub(crate) fn new(index: usize, interactive: bool, cols: u16, rows: u16) -> Self {
        Self {
            index,
            session_id: None,
            host_label: String::new(),
            interactive,
            file_root: None,
            markdown_path: None,
            surface: None,
            output_buffer: None,
            status_bar: None,
            resize_debounce: None,
            content: PaneContent::Empty,
            last_size: (cols, rows),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn host_label(&self) -> &str {
        &self.host_label
    }

    pub fn markdown_path(&self) -> Option<&str> {
        self.markdown_path.as_deref()
    }

    pub fn status_bar(&self) -> Option<&StatusBar> {
        self.status_bar.as_ref()
    }

    pub fn content(&self) -> &PaneContent {
        &self.content
    }

    pub fn content_mode(&self) -> Option<ContentMode> {
        self.content.mode()
    }

    /// Placeholder text for an inert cell, `None` for live panes.
    pub fn placeholder_text(&self) -> Option<&'static str> {
        (!self.interactive).then_some(EMPTY_PANE_TEXT)
    }
}
