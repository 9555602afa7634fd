//! Cell buffer a widget or the renderer draws into.
//!
//! A `Canvas` is always addressed in local coordinates: its area is
//! `Rect::from_size(size)`. Placement on the screen is the caller's concern
//! (`copy_to` takes the destination offset). Canvases never clear
//! themselves; a cell keeps its value until overwritten.

use crate::cell::{Cell, Style};
use crate::geom::{Point, Rect, Size};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("point {point} falls outside the canvas area {area}")]
    OutOfBounds { point: Point, area: Rect },
    #[error("wide rune at {point} does not fit before the right edge of {area}")]
    WideRuneOverflow { point: Point, area: Rect },
    #[error("rectangle {rect} is not contained by the canvas area {area}")]
    RectOutside { rect: Rect, area: Rect },
}

/// Display width of a rune in cells: 1 or 2. Zero-width and control runes
/// still consume one cell so that every write is visible.
pub fn rune_width(r: char) -> usize {
    UnicodeWidthChar::width(r).unwrap_or(1).clamp(1, 2)
}

/// Display width of a string in cells.
pub fn str_width(s: &str) -> usize {
    s.chars().map(rune_width).sum()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    size: Size,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        let size = Size::new(size.width.max(0), size.height.max(0));
        Self {
            size,
            cells: vec![Cell::default(); size.area()],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn area(&self) -> Rect {
        Rect::from_size(self.size)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.area().contains(p) {
            Some(p.y as usize * self.size.width as usize + p.x as usize)
        } else {
            None
        }
    }

    fn out_of_bounds(&self, point: Point) -> CanvasError {
        CanvasError::OutOfBounds {
            point,
            area: self.area(),
        }
    }

    pub fn cell(&self, p: Point) -> Result<Cell, CanvasError> {
        self.index(p)
            .map(|i| self.cells[i])
            .ok_or_else(|| self.out_of_bounds(p))
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write `rune` at `p`, returning the number of cells it occupies.
    ///
    /// Overwriting one half of an existing wide rune blanks the other half so
    /// the buffer never holds an orphaned leader or continuation.
    pub fn set_cell(&mut self, p: Point, rune: char, style: Style) -> Result<usize, CanvasError> {
        let idx = self.index(p).ok_or_else(|| self.out_of_bounds(p))?;
        let width = rune_width(rune);
        if width == 2 && p.x + 1 >= self.size.width {
            return Err(CanvasError::WideRuneOverflow {
                point: p,
                area: self.area(),
            });
        }
        self.break_wide_at(p);
        if width == 2 {
            self.break_wide_at(Point::new(p.x + 1, p.y));
        }
        self.cells[idx] = Cell::leader(rune, width as u8, style);
        if width == 2 {
            self.cells[idx + 1] = Cell::continuation(style);
        }
        Ok(width)
    }

    /// Store a prepared cell verbatim (used when replaying flushed changes).
    pub fn put(&mut self, p: Point, cell: Cell) -> Result<(), CanvasError> {
        let idx = self.index(p).ok_or_else(|| self.out_of_bounds(p))?;
        self.cells[idx] = cell;
        Ok(())
    }

    fn break_wide_at(&mut self, p: Point) {
        let Some(idx) = self.index(p) else {
            return;
        };
        let current = self.cells[idx];
        if current.width == 0 && p.x > 0 {
            // Continuation: blank the leader to its left.
            let lead = idx - 1;
            let style = self.cells[lead].style;
            self.cells[lead] = Cell {
                style,
                ..Cell::default()
            };
        } else if current.width == 2 && p.x + 1 < self.size.width {
            let style = self.cells[idx + 1].style;
            self.cells[idx + 1] = Cell {
                style,
                ..Cell::default()
            };
        }
    }

    /// Fill `rect` with `rune`. Wide runes are written every other column.
    pub fn fill(&mut self, rect: Rect, rune: char, style: Style) -> Result<(), CanvasError> {
        if !self.area().contains_rect(&rect) {
            return Err(CanvasError::RectOutside {
                rect,
                area: self.area(),
            });
        }
        let step = rune_width(rune) as i32;
        for y in rect.min.y..rect.max.y {
            let mut x = rect.min.x;
            while x + step <= rect.max.x {
                self.set_cell(Point::new(x, y), rune, style)?;
                x += step;
            }
        }
        Ok(())
    }

    /// Reset every cell to the blank default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Copy the cells under `rect` into a new, independent canvas.
    pub fn sub_canvas(&self, rect: Rect) -> Result<Canvas, CanvasError> {
        if !self.area().contains_rect(&rect) {
            return Err(CanvasError::RectOutside {
                rect,
                area: self.area(),
            });
        }
        let mut out = Canvas::new(rect.size());
        let (w, sw) = (rect.width() as usize, self.size.width as usize);
        for row in 0..rect.height() as usize {
            let src = (rect.min.y as usize + row) * sw + rect.min.x as usize;
            out.cells[row * w..(row + 1) * w].copy_from_slice(&self.cells[src..src + w]);
        }
        Ok(out)
    }

    /// Overwrite the region of `dst` starting at `offset` with this canvas.
    pub fn copy_to(&self, dst: &mut Canvas, offset: Point) -> Result<(), CanvasError> {
        let target = self.area().translate(offset);
        if !dst.area().contains_rect(&target) {
            return Err(CanvasError::RectOutside {
                rect: target,
                area: dst.area(),
            });
        }
        let w = self.size.width as usize;
        for y in 0..self.size.height {
            let src = y as usize * w;
            let Some(dst_start) = dst.index(Point::new(offset.x, offset.y + y)) else {
                continue;
            };
            dst.cells[dst_start..dst_start + w].copy_from_slice(&self.cells[src..src + w]);
        }
        Ok(())
    }

    /// Leader runes of one row as a string (tests and diagnostics).
    pub fn row_text(&self, y: i32) -> String {
        if y < 0 || y >= self.size.height {
            return String::new();
        }
        let start = y as usize * self.size.width as usize;
        self.cells[start..start + self.size.width as usize]
            .iter()
            .filter(|c| c.is_leader())
            .map(|c| c.rune)
            .collect()
    }
}
