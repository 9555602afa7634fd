//! Pure rectangle arithmetic used by the layout engine and widgets.
//!
//! Every split here tiles its input exactly: the two returned rectangles are
//! disjoint, adjacent along the split axis and together cover the input. Each
//! side receives at least one cell; inputs that cannot honor that fail with
//! `AreaError::TooSmall` instead of producing a zero-size child.

use crate::geom::{Point, Rect, Size};

/// Axis along which a region is divided.
///
/// `Horizontal` cuts with a horizontal line (top / bottom children);
/// `Vertical` cuts with a vertical line (left / right children).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AreaError {
    #[error("split percentage {0} must be within 1..=99")]
    InvalidPercent(i32),
    #[error("fixed split size {0} must be at least one cell")]
    InvalidFixed(i32),
    #[error("area of length {len} cannot be split into two non-empty parts")]
    TooSmall { len: i32 },
}

fn axis_len(r: &Rect, o: Orientation) -> i32 {
    match o {
        Orientation::Horizontal => r.height(),
        Orientation::Vertical => r.width(),
    }
}

/// Cut `r` so that the first child is exactly `first` cells long along `o`.
fn cut(r: &Rect, o: Orientation, first: i32) -> (Rect, Rect) {
    match o {
        Orientation::Horizontal => {
            let y = r.min.y + first;
            (
                Rect::new(r.min.x, r.min.y, r.max.x, y),
                Rect::new(r.min.x, y, r.max.x, r.max.y),
            )
        }
        Orientation::Vertical => {
            let x = r.min.x + first;
            (
                Rect::new(r.min.x, r.min.y, x, r.max.y),
                Rect::new(x, r.min.y, r.max.x, r.max.y),
            )
        }
    }
}

/// Give the first child `round(len * pct / 100)` cells (half rounds up),
/// clamped to `1..=len-1`.
pub fn split_percent(r: &Rect, o: Orientation, pct: i32) -> Result<(Rect, Rect), AreaError> {
    if !(1..=99).contains(&pct) {
        return Err(AreaError::InvalidPercent(pct));
    }
    let len = axis_len(r, o);
    if len < 2 {
        return Err(AreaError::TooSmall { len });
    }
    let first = ((len * pct + 50) / 100).clamp(1, len - 1);
    Ok(cut(r, o, first))
}

/// Reserve `cells` for the first child, leaving at least one cell for the second.
pub fn split_fixed(r: &Rect, o: Orientation, cells: i32) -> Result<(Rect, Rect), AreaError> {
    if cells < 1 {
        return Err(AreaError::InvalidFixed(cells));
    }
    let len = axis_len(r, o);
    if len < 2 {
        return Err(AreaError::TooSmall { len });
    }
    Ok(cut(r, o, cells.min(len - 1)))
}

/// Reserve `cells` for the second child, leaving at least one cell for the first.
pub fn split_fixed_from_end(
    r: &Rect,
    o: Orientation,
    cells: i32,
) -> Result<(Rect, Rect), AreaError> {
    if cells < 1 {
        return Err(AreaError::InvalidFixed(cells));
    }
    let len = axis_len(r, o);
    if len < 2 {
        return Err(AreaError::TooSmall { len });
    }
    Ok(cut(r, o, len - cells.min(len - 1)))
}

/// Remove a one-cell frame. Areas narrower or shorter than three cells have
/// no interior and yield an empty rectangle anchored at `r.min`.
pub fn exclude_border(r: &Rect) -> Rect {
    if r.width() < 3 || r.height() < 3 {
        return Rect::at(r.min, Size::ZERO);
    }
    Rect::new(r.min.x + 1, r.min.y + 1, r.max.x - 1, r.max.y - 1)
}

/// Cell padding on each side of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Padding {
    pub fn is_zero(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }
}

/// Shrink `r` by `pad`; over-padding collapses to an empty rectangle.
pub fn shrink(r: &Rect, pad: Padding) -> Rect {
    let x0 = r.min.x + pad.left;
    let y0 = r.min.y + pad.top;
    let x1 = r.max.x - pad.right;
    let y1 = r.max.y - pad.bottom;
    if x0 >= x1 || y0 >= y1 {
        return Rect::at(r.min, Size::ZERO);
    }
    Rect::new(x0, y0, x1, y1)
}

/// Largest rectangle anchored at `r.min` whose sides follow `ratio`.
/// A zero ratio component disables the constraint.
pub fn with_ratio(r: &Rect, ratio: Size) -> Rect {
    if ratio.width <= 0 || ratio.height <= 0 || r.is_empty() {
        return *r;
    }
    let by_width = r.width() * ratio.height / ratio.width;
    let size = if by_width <= r.height() {
        Size::new(r.width(), by_width)
    } else {
        Size::new(r.height() * ratio.width / ratio.height, r.height())
    };
    Rect::at(r.min, size)
}

/// Cap `size` to `max`; zero components of `max` mean unbounded.
pub fn cap_size(size: Size, max: Size) -> Size {
    Size::new(
        if max.width > 0 {
            size.width.min(max.width)
        } else {
            size.width
        },
        if max.height > 0 {
            size.height.min(max.height)
        } else {
            size.height
        },
    )
}

/// Centre point helper used by placeholders and text alignment.
pub fn center(r: &Rect) -> Point {
    Point::new(r.min.x + r.width() / 2, r.min.y + r.height() / 2)
}
