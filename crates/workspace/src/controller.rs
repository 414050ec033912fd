//! The workspace controller.
//!
//! One instance per active grid. Owns the pane records, the grid geometry
//! and resizer, and the active-pane index; orchestrates attach, content
//! switches, status updates, and teardown. All operations are synchronous
//! and local except file and markdown fetches, which run on pane-owned
//! tasks and fail soft.

use file_browser::{FileBrowser, ToastKind};
use grid::{Axis, BoxMetrics, CellFrame, DividerFrame, GridGeometry, GridResizer};
use parking_lot::Mutex;
use session::{SessionBackend, SessionEvent};
use std::sync::Arc;
use std::time::Duration;
use terminal::{FrameClock, OutputBuffer, SurfaceFactory};
use tokio::time::MissedTickBehavior;
use util::{Debouncer, LatencyRecorder, TaskGuard};

use crate::markdown::{self, MarkdownRenderer, MarkdownView};
use crate::pane::{ContentMode, Pane, PaneContent, StatusBar};
use crate::status::PaneStatus;

/// Behavior knobs, defaulted from the constants module and overridable from
/// the user config.
#[derive(Debug, Clone)]
pub struct Tunables {
    pub resize_debounce: Duration,
    pub file_refresh: Duration,
    pub markdown_refresh: Duration,
    /// Initial surface size for newly attached panes.
    pub surface_cols: u16,
    pub surface_rows: u16,
}

impl Default for Tunables {
    fn default() -> Self {
        use settings::constants::{terminal, timing};
        Self {
            resize_debounce: timing::RESIZE_DEBOUNCE,
            file_refresh: timing::FILE_BROWSER_REFRESH,
            markdown_refresh: timing::MARKDOWN_REFRESH,
            surface_cols: terminal::DEFAULT_COLS,
            surface_rows: terminal::DEFAULT_ROWS,
        }
    }
}

impl Tunables {
    pub fn from_config(config: &settings::Config) -> Self {
        Self {
            resize_debounce: Duration::from_millis(config.resize_debounce_ms),
            file_refresh: Duration::from_secs(config.file_refresh_secs),
            markdown_refresh: Duration::from_secs(config.markdown_refresh_secs),
            ..Self::default()
        }
    }
}

/// External collaborators, injected by the shell.
pub struct WorkspaceDeps {
    pub backend: Arc<dyn SessionBackend>,
    pub surfaces: Arc<dyn SurfaceFactory>,
    pub markdown: Arc<dyn MarkdownRenderer>,
    pub frames: FrameClock,
    /// Notification sink for fail-soft errors.
    pub toast: Arc<dyn Fn(&str, ToastKind) + Send + Sync>,
    /// Invoked when a file browser selects a markdown file; the shell
    /// routes it back into [`Workspace::open_markdown_file`].
    pub on_open_markdown: Arc<dyn Fn(usize, &str) + Send + Sync>,
    /// Optional flush-latency observability.
    pub latency: Option<Arc<Mutex<LatencyRecorder>>>,
    pub tunables: Tunables,
}

/// Controller for one workspace grid.
pub struct Workspace {
    panes: Vec<Pane>,
    geometry: GridGeometry,
    resizer: Option<GridResizer>,
    active_pane: usize,
    deps: WorkspaceDeps,
}

impl Workspace {
    /// Build the grid and resizer. The first `connection_count` cells are
    /// live panes; the rest are inert placeholders. Pane 0 starts active.
    pub fn new(rows: usize, cols: usize, connection_count: usize, deps: WorkspaceDeps) -> Self {
        let (surface_cols, surface_rows) =
            (deps.tunables.surface_cols, deps.tunables.surface_rows);
        let panes = (0..rows * cols)
            .map(|index| {
                Pane::new(
                    index,
                    index < connection_count,
                    surface_cols,
                    surface_rows,
                )
            })
            .collect();

        Self {
            panes,
            geometry: GridGeometry::new(rows, cols),
            resizer: GridResizer::needed(rows, cols).then(GridResizer::new),
            active_pane: 0,
            deps,
        }
    }

    // ==================== Pane access ====================

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn pane(&self, index: usize) -> Option<&Pane> {
        self.panes.get(index)
    }

    pub fn active_pane_index(&self) -> usize {
        self.active_pane
    }

    /// Mark exactly one pane visually active.
    pub fn set_active_pane(&mut self, index: usize) {
        if index < self.panes.len() {
            self.active_pane = index;
        }
    }

    /// A click on a live pane makes it active; returns true when the shell
    /// should focus the pane's surface. Placeholder cells ignore clicks.
    pub fn click_pane(&mut self, index: usize) -> bool {
        match self.panes.get(index) {
            Some(pane) if pane.interactive => {
                self.active_pane = index;
                true
            }
            _ => false,
        }
    }

    fn pane_index_for_session(&self, session_id: &str) -> Option<usize> {
        self.panes
            .iter()
            .position(|pane| pane.session_id.as_deref() == Some(session_id))
    }

    // ==================== Lifecycle ====================

    /// Create the pane's surface, status bar, output buffer, and resize
    /// debouncer. No-op if already attached or for a placeholder cell.
    pub fn attach_terminal(&mut self, index: usize) {
        let deps = &self.deps;
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        if !pane.interactive || pane.surface.is_some() {
            return;
        }

        let (cols, rows) = pane.last_size;
        let surface = deps.surfaces.create(cols, rows);

        let mut buffer = OutputBuffer::new(Arc::clone(&surface), deps.frames.clone());
        if let Some(latency) = &deps.latency {
            buffer = buffer.with_latency(Arc::clone(latency));
        }

        pane.surface = Some(surface);
        pane.output_buffer = Some(buffer);
        pane.status_bar = Some(StatusBar::new(pane.host_label.clone()));
        pane.resize_debounce = Some(Debouncer::new(deps.tunables.resize_debounce));
        pane.content = PaneContent::Terminal;
    }

    /// Swap what occupies the pane body. Replacing the content drops the
    /// previous mode's refresh timer before the new one (if any) starts, so
    /// timers are mutually exclusive and nothing orphans.
    pub fn switch_pane_content(&mut self, index: usize, mode: ContentMode) {
        let backend = Arc::clone(&self.deps.backend);
        let renderer = Arc::clone(&self.deps.markdown);
        let toast = Arc::clone(&self.deps.toast);
        let open_markdown = Arc::clone(&self.deps.on_open_markdown);
        let tunables = self.deps.tunables.clone();

        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        if pane.surface.is_none() {
            return;
        }

        pane.content = match mode {
            ContentMode::Terminal => {
                // Reveal the surface and re-fit it after layout churn.
                if let Some(surface) = &pane.surface {
                    let (cols, rows) = pane.last_size;
                    surface.lock().resize(cols, rows);
                }
                PaneContent::Terminal
            }

            ContentMode::FileBrowser => {
                let pane_index = pane.index;
                let browser = FileBrowser::new(
                    backend,
                    Box::new(move |path| (open_markdown)(pane_index, path)),
                    Box::new(move |message, kind| (toast)(message, kind)),
                );
                let changed =
                    browser.set_context(pane.session_id.as_deref(), pane.file_root.as_deref());

                let task_browser = browser.clone();
                let period = tunables.file_refresh;
                let guard = TaskGuard::spawn(async move {
                    if changed {
                        task_browser.refresh().await;
                    }
                    let mut interval = tokio::time::interval(period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    interval.tick().await; // first tick completes immediately
                    loop {
                        interval.tick().await;
                        task_browser.refresh().await;
                    }
                });
                PaneContent::FileBrowser {
                    browser,
                    _refresh: guard,
                }
            }

            ContentMode::Markdown => {
                let view = Arc::new(Mutex::new(MarkdownView::new(
                    pane.session_id.clone(),
                    pane.markdown_path.clone(),
                )));

                let task_view = Arc::clone(&view);
                let period = tunables.markdown_refresh;
                let guard = TaskGuard::spawn(async move {
                    // Redisplay the remembered file right away.
                    markdown::refresh_view(&task_view, &backend, &renderer, true).await;
                    let mut interval = tokio::time::interval(period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                    interval.tick().await;
                    loop {
                        interval.tick().await;
                        markdown::refresh_view(&task_view, &backend, &renderer, false).await;
                    }
                });
                PaneContent::Markdown {
                    view,
                    _refresh: guard,
                }
            }
        };

        if let Some(bar) = pane.status_bar.as_mut() {
            bar.content_mode = mode;
        }
    }

    /// User-triggered refresh of the current content mode. The file browser
    /// reloads its root listing (loaded children keep their cache); markdown
    /// re-fetches and re-renders even when the content is unchanged.
    pub fn refresh_pane_content(&mut self, index: usize) {
        let backend = Arc::clone(&self.deps.backend);
        let renderer = Arc::clone(&self.deps.markdown);
        let Some(pane) = self.panes.get(index) else {
            return;
        };
        match &pane.content {
            PaneContent::FileBrowser { browser, .. } => {
                let browser = browser.clone();
                tokio::spawn(async move { browser.refresh().await });
            }
            PaneContent::Markdown { view, .. } => {
                let view = Arc::clone(view);
                tokio::spawn(async move {
                    markdown::refresh_view(&view, &backend, &renderer, true).await;
                });
            }
            PaneContent::Empty | PaneContent::Terminal => {}
        }
    }

    /// Remember `path` for the pane and show it in markdown mode. This is
    /// where the file browser's open-markdown callback lands.
    pub fn open_markdown_file(&mut self, index: usize, path: &str) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        pane.markdown_path = Some(path.to_string());
        self.switch_pane_content(index, ContentMode::Markdown);
    }

    /// Tear the pane down to an empty reusable shell. Safe to call twice.
    pub fn detach_terminal(&mut self, index: usize) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };

        if let Some(debounce) = pane.resize_debounce.take() {
            debounce.cancel();
        }
        // Dropping the content aborts any mode refresh timer.
        pane.content = PaneContent::Empty;
        if let Some(buffer) = pane.output_buffer.take() {
            // Abort the pending flush before the surface goes away.
            buffer.shutdown();
        }
        pane.surface = None;
        pane.status_bar = None;
    }

    /// Detach every pane and reset the workspace-level state.
    pub fn destroy(&mut self) {
        for index in 0..self.panes.len() {
            self.detach_terminal(index);
        }
        self.resizer = None;
        self.active_pane = 0;
    }

    // ==================== Sessions & status ====================

    /// Bind a backend session to the pane (or clear it with `None`). A file
    /// browser currently showing re-scopes to the new context.
    pub fn bind_session(&mut self, index: usize, session_id: Option<String>) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        pane.session_id = session_id;
        Self::resync_browser_context(pane);
    }

    /// Set the root directory used by the pane's file-browser mode.
    pub fn set_pane_file_root(&mut self, index: usize, root: Option<String>) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        pane.file_root = root;
        Self::resync_browser_context(pane);
    }

    fn resync_browser_context(pane: &mut Pane) {
        if let PaneContent::FileBrowser { browser, .. } = &pane.content {
            if browser.set_context(pane.session_id.as_deref(), pane.file_root.as_deref()) {
                let browser = browser.clone();
                tokio::spawn(async move { browser.refresh().await });
            }
        }
    }

    pub fn set_pane_host_label(&mut self, index: usize, label: &str) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        pane.host_label = label.to_string();
        if let Some(bar) = pane.status_bar.as_mut() {
            bar.host_label = label.to_string();
        }
    }

    /// Apply a status to the pane's status bar. The name is matched
    /// case-insensitively; unknown names still color the dot but get no
    /// default text. The reconnect affordance shows only for failed states.
    pub fn update_pane_status(&mut self, index: usize, status: &str, text: Option<&str>) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        let Some(bar) = pane.status_bar.as_mut() else {
            return;
        };

        let dot_class = status.to_ascii_lowercase();
        let parsed = PaneStatus::parse(&dot_class);

        if let (Some(previous), Some(next)) = (bar.status, parsed) {
            if previous != next && !previous.can_transition_to(next) {
                tracing::debug!(
                    pane = index,
                    "unexpected status transition {previous:?} -> {next:?}"
                );
            }
        }

        bar.status_text = match text {
            Some(text) => text.to_string(),
            None => parsed.map(|s| s.default_text()).unwrap_or_default().to_string(),
        };
        bar.reconnect_visible = parsed.is_some_and(PaneStatus::shows_reconnect);
        bar.dot_class = dot_class;
        bar.status = parsed;
    }

    /// Route one backend event to the pane bound to its session.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Output { session_id, bytes } => {
                if let Some(index) = self.pane_index_for_session(&session_id) {
                    self.write_output(index, bytes);
                }
            }
            SessionEvent::Status { session_id, event } => {
                if let Some(index) = self.pane_index_for_session(&session_id) {
                    let name = event.status_name().to_string();
                    let text = event.display_text();
                    self.update_pane_status(index, &name, text.as_deref());
                }
            }
        }
    }

    /// Queue output bytes into the pane's coalescing buffer. Chunks for a
    /// detached pane are dropped.
    pub fn write_output(&self, index: usize, bytes: Vec<u8>) {
        if let Some(buffer) = self.panes.get(index).and_then(|p| p.output_buffer.as_ref()) {
            buffer.write(bytes);
        }
    }

    /// Fire the manual reconnect command and re-enter the reconnecting
    /// display state. Only available while the affordance is visible.
    pub fn request_reconnect(&mut self, index: usize) {
        let Some(pane) = self.panes.get(index) else {
            return;
        };
        if !pane
            .status_bar
            .as_ref()
            .is_some_and(|bar| bar.reconnect_visible)
        {
            return;
        }
        let Some(session_id) = pane.session_id.clone() else {
            return;
        };

        let backend = Arc::clone(&self.deps.backend);
        tokio::spawn(async move {
            if let Err(error) = backend.reconnect(&session_id).await {
                tracing::warn!("reconnect request failed for {session_id}: {error}");
            }
        });
        self.update_pane_status(index, "reconnecting", None);
    }

    /// Debounced surface re-fit after layout churn; only the last
    /// observation within the window lands.
    pub fn pane_resized(&mut self, index: usize, cols: u16, rows: u16) {
        let Some(pane) = self.panes.get_mut(index) else {
            return;
        };
        pane.last_size = (cols, rows);
        let (Some(surface), Some(debounce)) = (&pane.surface, &pane.resize_debounce) else {
            return;
        };
        let surface = Arc::clone(surface);
        debounce.call(move || {
            surface.lock().resize(cols, rows);
        });
    }

    // ==================== Geometry ====================

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Cell frames in row-major order for the current container box.
    pub fn cell_frames(&self, metrics: &BoxMetrics) -> Vec<CellFrame> {
        self.geometry.cell_frames(metrics)
    }

    /// Divider bands, recomputed from the live container on every call.
    pub fn dividers(&self, metrics: &BoxMetrics) -> Vec<DividerFrame> {
        match &self.resizer {
            Some(resizer) => resizer.dividers(&self.geometry, metrics),
            None => Vec::new(),
        }
    }

    pub fn begin_divider_drag(&mut self, metrics: &BoxMetrics, axis: Axis, index: usize) -> bool {
        match self.resizer.as_mut() {
            Some(resizer) => resizer.begin_drag(&self.geometry, metrics, axis, index),
            None => false,
        }
    }

    pub fn drag_divider_to(&mut self, leading_px: f64) -> bool {
        match self.resizer.as_mut() {
            Some(resizer) => resizer.drag_to(&mut self.geometry, leading_px),
            None => false,
        }
    }

    pub fn end_divider_drag(&mut self) {
        if let Some(resizer) = self.resizer.as_mut() {
            resizer.end_drag();
        }
    }
}
