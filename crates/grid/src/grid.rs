//! Workspace grid geometry.
//!
//! An R×C arrangement of pane cells sized by relative fractions, plus the
//! divider resizer that redistributes space between adjacent rows or columns.
//! Everything here is pure pixel math: the shell owns the actual surfaces
//! and re-applies the computed frames on every layout pass.

mod geometry;
mod presets;
mod resizer;

pub use geometry::{BoxMetrics, CellFrame, GridGeometry};
pub use presets::{preset, GRID_PRESETS};
pub use resizer::{Axis, DividerFrame, GridResizer};
