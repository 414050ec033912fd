//! Divider drag handling.
//!
//! A divider sits between two adjacent rows or columns. Dragging it
//! redistributes space within exactly that pair: the pair's combined
//! fraction weight is preserved, so every other track keeps its size.
//! Pointer capture binds one divider at a time, which serializes drags.

use crate::{BoxMetrics, GridGeometry};

/// Which track direction a divider separates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Divider between row `index` and row `index + 1`.
    Row,
    /// Divider between column `index` and column `index + 1`.
    Col,
}

/// Pixel band a divider occupies (the gap between its two tracks).
/// The shell overlays its hit area on top of this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerFrame {
    pub axis: Axis,
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    axis: Axis,
    index: usize,
    /// Combined pixel size of the two tracks at drag start.
    pair_total_px: f64,
    /// Combined fraction weight of the pair; preserved exactly.
    pair_fraction_total: f64,
}

/// Drag session state for one grid.
///
/// Skipped entirely for a 1x1 grid (`dividers` is empty and there is
/// nothing to drag).
#[derive(Debug)]
pub struct GridResizer {
    min_pane_px: f64,
    drag: Option<DragState>,
}

impl GridResizer {
    pub fn new() -> Self {
        Self::with_min_pane(settings::constants::grid::MIN_PANE_PX)
    }

    pub fn with_min_pane(min_pane_px: f64) -> Self {
        Self {
            min_pane_px,
            drag: None,
        }
    }

    /// Whether a grid of this shape needs a resizer at all.
    pub fn needed(rows: usize, cols: usize) -> bool {
        rows > 1 || cols > 1
    }

    /// Divider bands for the current fractions and container box,
    /// recomputed on every layout pass.
    pub fn dividers(&self, geometry: &GridGeometry, metrics: &BoxMetrics) -> Vec<DividerFrame> {
        let mut frames = Vec::new();

        let col_sizes = geometry.col_sizes(metrics);
        let mut x = 0.0;
        for (index, size) in col_sizes.iter().enumerate().take(col_sizes.len().saturating_sub(1)) {
            x += size;
            frames.push(DividerFrame {
                axis: Axis::Col,
                index,
                x,
                y: 0.0,
                width: metrics.gap,
                height: metrics.height,
            });
            x += metrics.gap;
        }

        let row_sizes = geometry.row_sizes(metrics);
        let mut y = 0.0;
        for (index, size) in row_sizes.iter().enumerate().take(row_sizes.len().saturating_sub(1)) {
            y += size;
            frames.push(DividerFrame {
                axis: Axis::Row,
                index,
                x: 0.0,
                y,
                width: metrics.width,
                height: metrics.gap,
            });
            y += metrics.gap;
        }

        frames
    }

    /// Start dragging the divider between tracks `index` and `index + 1`.
    ///
    /// Snapshots the pair's current pixel total from the container box.
    /// Returns false (and arms nothing) for an out-of-range divider or a
    /// degenerate container where the pair has no positive extent.
    pub fn begin_drag(
        &mut self,
        geometry: &GridGeometry,
        metrics: &BoxMetrics,
        axis: Axis,
        index: usize,
    ) -> bool {
        let (sizes, fractions) = match axis {
            Axis::Row => (geometry.row_sizes(metrics), geometry.row_fractions()),
            Axis::Col => (geometry.col_sizes(metrics), geometry.col_fractions()),
        };
        if index + 1 >= sizes.len() {
            return false;
        }

        let pair_total_px = sizes[index] + sizes[index + 1];
        if pair_total_px <= 0.0 {
            // Degenerate container; skip the update rather than divide by zero.
            return false;
        }

        self.drag = Some(DragState {
            axis,
            index,
            pair_total_px,
            pair_fraction_total: fractions[index] + fractions[index + 1],
        });
        true
    }

    /// Move the active divider so the leading (left/top) track would be
    /// `leading_px` tall/wide, clamped so neither sibling drops below the
    /// minimum pane size. Returns true when fractions changed.
    pub fn drag_to(&mut self, geometry: &mut GridGeometry, leading_px: f64) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };

        let lo = self.min_pane_px;
        let hi = drag.pair_total_px - self.min_pane_px;
        if hi < lo {
            // Pair too small to honor the minimum on both sides; no-op.
            return false;
        }

        let clamped = leading_px.clamp(lo, hi);
        let first = clamped / drag.pair_total_px * drag.pair_fraction_total;
        let second = drag.pair_fraction_total - first;
        geometry.set_fraction_pair(drag.axis, drag.index, first, second);
        true
    }

    /// Pointer release: the drag session ends. No snapping, no persistence.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

impl Default for GridResizer {
    fn default() -> Self {
        Self::new()
    }
}
