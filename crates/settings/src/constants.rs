//! Centralized configuration constants for gridmux.
//!
//! Compile-time constants for layout, timing, and limits, organized by
//! component for maintainability.

/// Grid and resizer configuration.
pub mod grid {
    /// Minimum pane edge length during a divider drag, in pixels.
    pub const MIN_PANE_PX: f64 = 140.0;

    /// Gap between adjacent grid cells, in pixels.
    pub const CELL_GAP: f64 = 4.0;
}

/// Timing configuration.
pub mod timing {
    use std::time::Duration;

    /// Trailing debounce for surface re-fit after resize churn.
    pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

    /// Periodic refresh while a pane shows the file browser.
    pub const FILE_BROWSER_REFRESH: Duration = Duration::from_secs(10);

    /// Periodic refresh while a pane shows a markdown file.
    pub const MARKDOWN_REFRESH: Duration = Duration::from_secs(5);

    /// Frame driver period in the demo shell (~60 Hz).
    pub const FRAME_PERIOD: Duration = Duration::from_millis(16);
}

/// File browser rendering.
pub mod file_browser {
    /// Left padding of a depth-0 row, in pixels.
    pub const BASE_INDENT: f32 = 4.0;

    /// Additional indent per tree depth level, in pixels.
    pub const INDENT_PER_DEPTH: f32 = 14.0;
}

/// Terminal surface configuration.
pub mod terminal {
    /// Default scrollback buffer size in lines.
    pub const SCROLLBACK_LINES: usize = 10_000;

    /// Default surface width in columns.
    pub const DEFAULT_COLS: u16 = 80;

    /// Default surface height in rows.
    pub const DEFAULT_ROWS: u16 = 24;
}

/// Backend request limits.
pub mod session {
    /// Default cap for a single remote file read (1 MiB).
    pub const MAX_READ_BYTES: u64 = 1024 * 1024;
}

/// Settings file validation limits.
pub mod settings {
    /// Maximum settings file size in bytes (64 KB).
    /// Settings files should be tiny; anything larger is suspicious.
    pub const MAX_FILE_SIZE: u64 = 64 * 1024;
}
