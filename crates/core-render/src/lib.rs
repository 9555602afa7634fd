//! Drawing primitives, frame diffing and the render engine.
//!
//! Pipeline for one pass (`RenderEngine::render`):
//! 1. Relayout the container so geometry reflects the latest size.
//! 2. Walk nodes in pre-order on a blank root canvas: borders and titles
//!    first, then either a resize-needed placeholder or the widget's drawing
//!    (made on an independent sub-canvas and copied back).
//! 3. Diff the composed frame against the last flushed one.
//! 4. Clear the display when there is no comparable previous frame, then
//!    flush only the changed cells.
//!
//! Failure in step 2 leaves both the display and the stored frame untouched.

pub mod diff;
pub mod draw;
pub mod metrics;
pub mod render_engine;

pub use diff::diff_canvas;
pub use metrics::{RenderMetrics, RenderMetricsSnapshot};
pub use render_engine::{RenderEngine, RenderError, RenderStats, compose};
