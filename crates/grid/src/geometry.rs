//! Fractional R×C grid geometry.
//!
//! Rows and columns carry relative fractions, not pixel sizes. Only the
//! pairwise ratio at a dragged divider ever changes, so the fraction sums
//! may drift from `rows`/`cols` over time; all pixel math normalizes by the
//! current sum. A fresh geometry always starts uniform.

/// The container's inner box and the gap between adjacent cells, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxMetrics {
    pub width: f64,
    pub height: f64,
    pub gap: f64,
}

impl BoxMetrics {
    pub fn new(width: f64, height: f64, gap: f64) -> Self {
        Self { width, height, gap }
    }
}

/// Pixel frame of one grid cell, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    /// Row-major cell index; immutable for the grid's lifetime.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Fraction state for one grid instance.
///
/// Rows/cols are assumed positive; validation is the caller's contract with
/// the form layer.
#[derive(Debug, Clone)]
pub struct GridGeometry {
    rows: usize,
    cols: usize,
    row_fractions: Vec<f64>,
    col_fractions: Vec<f64>,
}

impl GridGeometry {
    /// A fresh grid with uniform fractions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_fractions: vec![1.0; rows],
            col_fractions: vec![1.0; cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn row_fractions(&self) -> &[f64] {
        &self.row_fractions
    }

    pub fn col_fractions(&self) -> &[f64] {
        &self.col_fractions
    }

    /// Pixel sizes of all row tracks for the given container box.
    pub fn row_sizes(&self, metrics: &BoxMetrics) -> Vec<f64> {
        track_sizes(&self.row_fractions, metrics.height, metrics.gap)
    }

    /// Pixel sizes of all column tracks for the given container box.
    pub fn col_sizes(&self, metrics: &BoxMetrics) -> Vec<f64> {
        track_sizes(&self.col_fractions, metrics.width, metrics.gap)
    }

    /// Frames of all cells in row-major order.
    pub fn cell_frames(&self, metrics: &BoxMetrics) -> Vec<CellFrame> {
        let col_sizes = self.col_sizes(metrics);
        let row_sizes = self.row_sizes(metrics);

        let mut frames = Vec::with_capacity(self.cell_count());
        let mut y = 0.0;
        for (row, height) in row_sizes.iter().enumerate() {
            let mut x = 0.0;
            for (col, width) in col_sizes.iter().enumerate() {
                frames.push(CellFrame {
                    index: row * self.cols + col,
                    row,
                    col,
                    x,
                    y,
                    width: *width,
                    height: *height,
                });
                x += width + metrics.gap;
            }
            y += height + metrics.gap;
        }
        frames
    }

    /// Overwrite one adjacent fraction pair. Resizer-internal: callers go
    /// through `GridResizer`, which preserves the pair sum.
    pub(crate) fn set_fraction_pair(
        &mut self,
        axis: super::Axis,
        index: usize,
        first: f64,
        second: f64,
    ) {
        let fractions = match axis {
            super::Axis::Row => &mut self.row_fractions,
            super::Axis::Col => &mut self.col_fractions,
        };
        fractions[index] = first;
        fractions[index + 1] = second;
    }
}

/// Distribute the container extent across tracks proportionally to their
/// fractions, after reserving the inter-cell gaps.
fn track_sizes(fractions: &[f64], total_px: f64, gap: f64) -> Vec<f64> {
    let count = fractions.len();
    if count == 0 {
        return Vec::new();
    }
    let available = (total_px - gap * (count - 1) as f64).max(0.0);
    let sum: f64 = fractions.iter().sum();
    if sum <= 0.0 {
        return vec![0.0; count];
    }
    fractions.iter().map(|f| f / sum * available).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const NO_GAP: BoxMetrics = BoxMetrics {
        width: 900.0,
        height: 600.0,
        gap: 0.0,
    };

    #[test_case(1, 1)]
    #[test_case(2, 1)]
    #[test_case(2, 2)]
    #[test_case(2, 3)]
    #[test_case(3, 3)]
    fn cell_count_matches_rows_times_cols(rows: usize, cols: usize) {
        let geometry = GridGeometry::new(rows, cols);
        assert_eq!(geometry.cell_frames(&NO_GAP).len(), rows * cols);
    }

    #[test]
    fn frames_are_row_major() {
        let geometry = GridGeometry::new(2, 3);
        let frames = geometry.cell_frames(&NO_GAP);

        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.index, i);
            assert_eq!(frame.row, i / 3);
            assert_eq!(frame.col, i % 3);
        }
        // Second row starts below the first.
        assert!(frames[3].y > frames[2].y);
        // Within a row, cells advance left to right.
        assert!(frames[1].x > frames[0].x);
    }

    #[test]
    fn uniform_grid_splits_evenly() {
        let geometry = GridGeometry::new(2, 3);
        let frames = geometry.cell_frames(&NO_GAP);

        for frame in &frames {
            assert!((frame.width - 300.0).abs() < 1e-9);
            assert!((frame.height - 300.0).abs() < 1e-9);
        }
    }

    #[test]
    fn gap_reduces_available_space() {
        let metrics = BoxMetrics::new(900.0, 600.0, 10.0);
        let geometry = GridGeometry::new(1, 3);
        let sizes = geometry.col_sizes(&metrics);

        let total: f64 = sizes.iter().sum();
        assert!((total - 880.0).abs() < 1e-9);
        // Second column starts one gap past the first's right edge.
        let frames = geometry.cell_frames(&metrics);
        assert!((frames[1].x - (sizes[0] + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_size_container_yields_zero_tracks() {
        let metrics = BoxMetrics::new(0.0, 0.0, 8.0);
        let geometry = GridGeometry::new(2, 2);
        for size in geometry.col_sizes(&metrics) {
            assert_eq!(size, 0.0);
        }
    }

    #[test]
    fn fractions_scale_track_sizes() {
        let mut geometry = GridGeometry::new(1, 2);
        geometry.set_fraction_pair(crate::Axis::Col, 0, 1.5, 0.5);

        let sizes = geometry.col_sizes(&NO_GAP);
        assert!((sizes[0] - 675.0).abs() < 1e-9);
        assert!((sizes[1] - 225.0).abs() < 1e-9);
    }
}
