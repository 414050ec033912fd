//! The opaque rendering surface a pane writes bytes to.
//!
//! The runtime never inspects what a surface does with its bytes; it only
//! writes, resizes, and drops. The production implementation feeds an
//! `alacritty_terminal` grid, which the shell's renderer reads out on its
//! own schedule.

use alacritty_terminal::event::VoidListener;
use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::term::{Config, Term};
use alacritty_terminal::vte::ansi::Processor;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::SharedSurface;

/// One pane's terminal-display object. Owned one-per-pane; created on
/// attach, destroyed on detach.
pub trait RenderSurface: Send {
    /// Apply a contiguous run of output bytes.
    fn write(&mut self, bytes: &[u8]);

    /// Re-fit the surface to a new cell grid size.
    fn resize(&mut self, cols: u16, rows: u16);

    /// Current size as (cols, rows).
    fn size(&self) -> (u16, u16);
}

/// Creates surfaces for panes; injected so tests can substitute a recorder.
pub trait SurfaceFactory: Send + Sync {
    fn create(&self, cols: u16, rows: u16) -> SharedSurface;
}

/// Surface dimensions, bridging to alacritty's `Dimensions`.
#[derive(Debug, Clone, Copy)]
struct SurfaceSize {
    cols: u16,
    rows: u16,
}

impl Dimensions for SurfaceSize {
    fn total_lines(&self) -> usize {
        self.rows as usize
    }

    fn screen_lines(&self) -> usize {
        self.rows as usize
    }

    fn columns(&self) -> usize {
        self.cols as usize
    }
}

/// Headless `alacritty_terminal`-backed surface.
pub struct TermSurface {
    term: Term<VoidListener>,
    processor: Processor,
    size: SurfaceSize,
}

impl TermSurface {
    pub fn new(cols: u16, rows: u16, scrollback_lines: usize) -> Self {
        let size = SurfaceSize { cols, rows };
        let mut config = Config::default();
        config.scrolling_history = scrollback_lines;
        Self {
            term: Term::new(config, &size, VoidListener),
            processor: Processor::new(),
            size,
        }
    }

    /// Read back one grid cell, for tests and diagnostics.
    pub fn cell_char(&self, line: usize, column: usize) -> char {
        use alacritty_terminal::index::{Column, Line};
        self.term.grid()[Line(line as i32)][Column(column)].c
    }
}

impl RenderSurface for TermSurface {
    fn write(&mut self, bytes: &[u8]) {
        self.processor.advance(&mut self.term, bytes);
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        if cols == self.size.cols && rows == self.size.rows {
            return;
        }
        self.size = SurfaceSize { cols, rows };
        self.term.resize(self.size);
    }

    fn size(&self) -> (u16, u16) {
        (self.size.cols, self.size.rows)
    }
}

/// Factory for production surfaces.
pub struct TermSurfaceFactory {
    scrollback_lines: usize,
}

impl TermSurfaceFactory {
    pub fn new(scrollback_lines: usize) -> Self {
        Self { scrollback_lines }
    }
}

impl Default for TermSurfaceFactory {
    fn default() -> Self {
        Self::new(settings::constants::terminal::SCROLLBACK_LINES)
    }
}

impl SurfaceFactory for TermSurfaceFactory {
    fn create(&self, cols: u16, rows: u16) -> SharedSurface {
        Arc::new(Mutex::new(TermSurface::new(
            cols,
            rows,
            self.scrollback_lines,
        )))
    }
}
