//! Drawing primitives shared by the renderer and widgets.
//!
//! Everything here writes through `Canvas::set_cell`, so wide runes and
//! bounds are handled in one place. Helpers clip to the canvas area instead
//! of failing unless stated otherwise.

use core_model::{
    Canvas, CanvasError, HAlign, LineStyle, Point, Rect, Style, VAlign, align_text, rune_width,
    str_width,
};

/// Rune drawn in the centre of a region that is too small for its content.
pub const RESIZE_NEEDED: char = '⇄';

const ELLIPSIS: char = '…';

/// What `text` does when the string does not fit before `max_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overrun {
    /// Fail with `OutOfBounds` at the first rune that does not fit.
    Strict,
    /// Stop drawing at the last rune that fits.
    #[default]
    Trim,
    /// Like `Trim`, but the last visible cell becomes `…`.
    Ellipsis,
}

/// Cut `s` to at most `width` cells. With `ellipsis`, a cut string ends in `…`.
pub fn trim_text(s: &str, width: usize, ellipsis: bool) -> String {
    if str_width(s) <= width {
        return s.to_string();
    }
    let room = if ellipsis { width.saturating_sub(1) } else { width };
    let mut used = 0;
    let mut out = String::new();
    for r in s.chars() {
        let w = rune_width(r);
        if used + w > room {
            break;
        }
        used += w;
        out.push(r);
    }
    if ellipsis && width > 0 {
        out.push(ELLIPSIS);
    }
    out
}

/// Draw one line of text starting at `start`, never past `max_x` (exclusive,
/// defaults to the canvas width). Returns the number of cells written.
pub fn text(
    canvas: &mut Canvas,
    start: Point,
    s: &str,
    style: Style,
    max_x: Option<i32>,
    overrun: Overrun,
) -> Result<usize, CanvasError> {
    let area = canvas.area();
    if !area.contains(start) {
        return Err(CanvasError::OutOfBounds { point: start, area });
    }
    let limit = max_x.unwrap_or(area.max.x).min(area.max.x);
    let avail = (limit - start.x).max(0) as usize;
    let fitted = match overrun {
        Overrun::Strict => {
            if str_width(s) > avail {
                return Err(CanvasError::OutOfBounds {
                    point: Point::new(start.x + avail as i32, start.y),
                    area,
                });
            }
            s.to_string()
        }
        Overrun::Trim => trim_text(s, avail, false),
        Overrun::Ellipsis => trim_text(s, avail, true),
    };
    let mut x = start.x;
    for r in fitted.chars() {
        x += canvas.set_cell(Point::new(x, start.y), r, style)? as i32;
    }
    Ok((x - start.x) as usize)
}

/// Draw a frame on the outermost cells of `rect`. Rectangles narrower or
/// shorter than two cells, and `LineStyle::None`, draw nothing.
pub fn border(
    canvas: &mut Canvas,
    rect: Rect,
    line: LineStyle,
    style: Style,
) -> Result<(), CanvasError> {
    let Some(runes) = line.runes() else {
        return Ok(());
    };
    if rect.width() < 2 || rect.height() < 2 {
        return Ok(());
    }
    if !canvas.area().contains_rect(&rect) {
        return Err(CanvasError::RectOutside {
            rect,
            area: canvas.area(),
        });
    }
    let (x0, y0, x1, y1) = (rect.min.x, rect.min.y, rect.max.x - 1, rect.max.y - 1);
    for x in x0 + 1..x1 {
        canvas.set_cell(Point::new(x, y0), runes.horizontal, style)?;
        canvas.set_cell(Point::new(x, y1), runes.horizontal, style)?;
    }
    for y in y0 + 1..y1 {
        canvas.set_cell(Point::new(x0, y), runes.vertical, style)?;
        canvas.set_cell(Point::new(x1, y), runes.vertical, style)?;
    }
    canvas.set_cell(Point::new(x0, y0), runes.top_left, style)?;
    canvas.set_cell(Point::new(x1, y0), runes.top_right, style)?;
    canvas.set_cell(Point::new(x0, y1), runes.bottom_left, style)?;
    canvas.set_cell(Point::new(x1, y1), runes.bottom_right, style)?;
    Ok(())
}

/// Draw `title` on the top edge of a bordered `rect`, between the corners.
pub fn border_title(
    canvas: &mut Canvas,
    rect: Rect,
    title: &str,
    align: HAlign,
    style: Style,
) -> Result<(), CanvasError> {
    if rect.width() < 3 || rect.height() < 2 || title.is_empty() {
        return Ok(());
    }
    let slot = Rect::new(rect.min.x + 1, rect.min.y, rect.max.x - 1, rect.min.y + 1);
    let fitted = trim_text(title, slot.width() as usize, true);
    let start = align_text(&slot, str_width(&fitted) as i32, align, VAlign::Top);
    text(canvas, start, &fitted, style, Some(slot.max.x), Overrun::Trim)?;
    Ok(())
}

/// Blank `rect` and mark its centre with the resize-needed rune.
pub fn resize_needed(canvas: &mut Canvas, rect: Rect) -> Result<(), CanvasError> {
    let rect = rect.intersect(&canvas.area());
    if rect.is_empty() {
        return Ok(());
    }
    canvas.fill(rect, ' ', Style::new())?;
    let mid = core_model::area::center(&rect);
    // A wide placeholder in the last column would overflow; fall back left.
    let at = if mid.x + 1 >= canvas.size().width && rune_width(RESIZE_NEEDED) == 2 {
        Point::new((mid.x - 1).max(rect.min.x), mid.y)
    } else {
        mid
    };
    canvas.set_cell(at, RESIZE_NEEDED, Style::new())?;
    Ok(())
}

/// Fill the part of `rect` inside the canvas with `rune`.
pub fn rectangle(canvas: &mut Canvas, rect: Rect, rune: char, style: Style) -> Result<(), CanvasError> {
    let clipped = rect.intersect(&canvas.area());
    if clipped.is_empty() {
        return Ok(());
    }
    canvas.fill(clipped, rune, style)
}
