//! Pane rendering surfaces and output plumbing.
//!
//! A pane writes terminal bytes to an opaque [`RenderSurface`]; the concrete
//! implementation wraps `alacritty_terminal` headlessly. Between the backend
//! stream and the surface sits the [`OutputBuffer`], which coalesces bursts
//! of small chunks into at most one surface write per display frame.

mod buffer;
mod frames;
mod surface;

pub use buffer::OutputBuffer;
pub use frames::{FrameClock, FrameDriver};
pub use surface::{RenderSurface, SurfaceFactory, TermSurface, TermSurfaceFactory};

use std::sync::Arc;

/// Shared handle to a pane's surface. Exclusively owned by one pane; the
/// handle is cloned only into that pane's own background tasks.
pub type SharedSurface = Arc<parking_lot::Mutex<dyn RenderSurface>>;
