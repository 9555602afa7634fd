//! Geometry, cells and canvases shared by every tiledash crate.
//!
//! Nothing in here knows about terminals, widgets or containers. The layout
//! engine works purely in terms of [`Rect`] arithmetic from [`area`], widgets
//! draw into a [`Canvas`], and the renderer diffs canvases into
//! [`CellChange`]s for a display.
//!
//! Coordinates are `i32` with `(0,0)` at the top-left; rectangles are
//! half-open (`max` is exclusive).

pub mod align;
pub mod area;
mod canvas;
mod cell;
mod geom;

pub use align::{HAlign, VAlign, align_rect, align_text};
pub use area::{AreaError, Orientation, Padding};
pub use canvas::{Canvas, CanvasError, rune_width, str_width};
pub use cell::{Attrs, Cell, Color, LineRunes, LineStyle, Style};
pub use geom::{Point, Rect, Size};

/// A single cell update produced by diffing two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub point: Point,
    pub cell: Cell,
}
