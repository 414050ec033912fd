//! gridmux - multi-session terminal workspace runtime
//!
//! The real product embeds the workspace crates behind a UI shell; this
//! binary is a headless demo shell that drives the full runtime against the
//! scripted in-process backend: grid creation, pane attach, output
//! coalescing, a reconnect cycle, file browsing, and a markdown preview.

mod scripted;

use anyhow::{Context, Result};
use file_browser::ToastKind;
use grid::{preset, Axis, BoxMetrics};
use gridmux_workspace::{
    ContentMode, MarkdownRenderer, PaneContent, Tunables, Workspace, WorkspaceDeps,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use scripted::ScriptedBackend;
use session::{SessionEvent, StatusEvent};
use std::sync::Arc;
use std::time::{Duration, Instant};
use terminal::{FrameDriver, TermSurfaceFactory};
use tracing::info;
use util::{LatencyRecorder, TaskGuard};

/// Application startup time for performance monitoring
static STARTUP_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Check if debug mode is enabled via environment variable.
fn is_debug_mode() -> bool {
    std::env::var("GRIDMUX_DEBUG").is_ok()
}

/// Initialize the logging system. RUST_LOG wins over the config filter,
/// which wins over the built-in default.
fn init_logging(config_filter: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fallback = if is_debug_mode() {
        "gridmux=trace,info".to_string()
    } else {
        config_filter
            .map(str::to_string)
            .unwrap_or_else(|| "gridmux=info,warn".to_string())
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_line_number(true))
        .with(filter)
        .init();
}

/// Initialize required directories (cross-platform).
fn init_paths() -> Result<()> {
    for dir in [
        settings::config_dir(),
        settings::data_dir(),
        settings::logs_dir(),
    ] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {dir:?}"))?;
    }
    Ok(())
}

/// Stand-in renderer: the real shell plugs its markdown pipeline in here.
struct PlainRenderer;

impl MarkdownRenderer for PlainRenderer {
    fn render(&self, source: &str) -> String {
        source.to_string()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    Lazy::force(&STARTUP_TIME);
    let config = settings::load_config();
    init_logging(config.log_filter.as_deref());
    init_paths()?;
    info!("gridmux v{} starting up", env!("CARGO_PKG_VERSION"));

    run_demo(config).await
}

async fn run_demo(config: settings::Config) -> Result<()> {
    let (rows, cols) = preset(&config.layout_preset).unwrap_or((2, 2));
    let backend = ScriptedBackend::demo();
    let latency = Arc::new(Mutex::new(LatencyRecorder::new()));
    let (md_tx, mut md_rx) = tokio::sync::mpsc::unbounded_channel::<(usize, String)>();

    // ~60 Hz frame pump for the output buffers.
    let driver = FrameDriver::new();
    let frames = driver.clock();
    let _frame_pump = TaskGuard::spawn(async move {
        let mut interval = tokio::time::interval(settings::constants::timing::FRAME_PERIOD);
        loop {
            interval.tick().await;
            driver.tick();
        }
    });

    let deps = WorkspaceDeps {
        backend: backend.clone(),
        surfaces: Arc::new(TermSurfaceFactory::new(config.scrollback_lines)),
        markdown: Arc::new(PlainRenderer),
        frames,
        toast: Arc::new(|message, kind| match kind {
            ToastKind::Error => tracing::warn!("toast: {message}"),
            ToastKind::Success => info!("toast: {message}"),
        }),
        on_open_markdown: Arc::new(move |pane, path| {
            let _ = md_tx.send((pane, path.to_string()));
        }),
        latency: Some(latency.clone()),
        tunables: Tunables::from_config(&config),
    };

    let connection_count = (rows * cols).min(3).max(1);
    let mut workspace = Workspace::new(rows, cols, connection_count, deps);
    info!("workspace {rows}x{cols} with {connection_count} live panes");

    // Activate sessions the way backend activation responses would.
    for index in 0..connection_count {
        workspace.attach_terminal(index);
        let session_id = backend.open_session();
        workspace.set_pane_host_label(index, &format!("demo@host-{index}"));
        workspace.bind_session(index, Some(session_id));
        workspace.set_pane_file_root(index, Some("/srv/demo".to_string()));
        workspace.update_pane_status(index, "connecting", None);
        workspace.update_pane_status(index, "connected", None);
    }

    // Stream canned output through the coalescing buffers.
    for index in 0..connection_count {
        let session_id = workspace
            .pane(index)
            .and_then(|pane| pane.session_id())
            .map(str::to_string)
            .context("pane lost its session binding")?;
        for bytes in ScriptedBackend::output_script(index) {
            workspace.handle_event(SessionEvent::Output {
                session_id: session_id.clone(),
                bytes,
            });
        }
    }
    tokio::time::sleep(Duration::from_millis(60)).await;

    // Walk pane 1 through a reconnect cycle, ending in a manual retry.
    if connection_count > 1 {
        let session_id = workspace
            .pane(1)
            .and_then(|pane| pane.session_id())
            .map(str::to_string)
            .context("pane lost its session binding")?;
        for event in [
            StatusEvent::Payload {
                status: "reconnecting".to_string(),
                message: None,
                attempt: Some(2),
                max: Some(3),
            },
            StatusEvent::Name("reconnect_failed".to_string()),
        ] {
            workspace.handle_event(SessionEvent::Status {
                session_id: session_id.clone(),
                event,
            });
        }
        workspace.request_reconnect(1);
        workspace.update_pane_status(1, "connected", None);
    }

    // Browse the demo tree and open the README preview on pane 0.
    workspace.switch_pane_content(0, ContentMode::FileBrowser);
    tokio::time::sleep(Duration::from_millis(60)).await;

    let browser = match workspace.pane(0).map(|pane| pane.content()) {
        Some(PaneContent::FileBrowser { browser, .. }) => Some(browser.clone()),
        _ => None,
    };
    if let Some(browser) = browser {
        browser.toggle_dir("/srv/demo/src").await;
        browser.select_file("/srv/demo/README.md");
    }
    while let Ok((pane, path)) = md_rx.try_recv() {
        workspace.open_markdown_file(pane, &path);
    }
    tokio::time::sleep(Duration::from_millis(60)).await;

    // Drag the first column divider, if the grid has one.
    let metrics = BoxMetrics::new(1280.0, 720.0, settings::constants::grid::CELL_GAP);
    if workspace.begin_divider_drag(&metrics, Axis::Col, 0) {
        workspace.drag_divider_to(500.0);
        workspace.end_divider_drag();
        let cell = workspace.cell_frames(&metrics)[0];
        info!("resized first column to {:.0}px", cell.width);
    }

    info!("flush latency: {}", latency.lock().summary());
    workspace.destroy();
    info!("demo complete in {:?}", STARTUP_TIME.elapsed());
    Ok(())
}
