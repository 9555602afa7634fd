//! Batched cell output.
//!
//! Consecutive cells on the same row that share a style are gathered into a
//! single `Print`; a cursor move is only queued when the next cell is not
//! where the previous print left the cursor, and style escapes are only
//! queued when the style actually changes. Everything is `queue!`d and the
//! underlying writer is flushed once per batch.
//!
//! Metrics:
//! * `print_commands` counts issued `Print` commands.
//! * `cells_printed` counts leader cells written. Continuation cells are
//!   skipped, the terminal advances over them when printing the wide rune.

use crate::color::ColorMode;
use anyhow::Result;
use core_model::{Attrs, Cell, Point, Style};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub print_commands: u64,
    pub cells_printed: u64,
    pub moves: u64,
}

pub struct BatchWriter<W: Write> {
    out: W,
    mode: ColorMode,
    pending: String,
    cursor: Option<Point>,
    style: Option<Style>,
    stats: BatchStats,
}

impl<W: Write> BatchWriter<W> {
    pub fn new(out: W, mode: ColorMode) -> Self {
        Self {
            out,
            mode,
            pending: String::new(),
            cursor: None,
            style: None,
            stats: BatchStats::default(),
        }
    }

    fn flush_pending(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let s = std::mem::take(&mut self.pending);
        queue!(self.out, Print(s))?;
        self.stats.print_commands += 1;
        Ok(())
    }

    fn set_style(&mut self, style: Style) -> Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(self.mode.to_crossterm(style.fg)),
            SetBackgroundColor(self.mode.to_crossterm(style.bg)),
        )?;
        for (flag, attr) in [
            (Attrs::BOLD, Attribute::Bold),
            (Attrs::ITALIC, Attribute::Italic),
            (Attrs::UNDERLINE, Attribute::Underlined),
            (Attrs::REVERSE, Attribute::Reverse),
            (Attrs::DIM, Attribute::Dim),
            (Attrs::BLINK, Attribute::SlowBlink),
        ] {
            if style.attrs.contains(flag) {
                queue!(self.out, SetAttribute(attr))?;
            }
        }
        self.style = Some(style);
        Ok(())
    }

    /// Queue `cell` at `point`. Continuation cells are ignored.
    pub fn put(&mut self, point: Point, cell: Cell) -> Result<()> {
        if !cell.is_leader() || point.x < 0 || point.y < 0 {
            return Ok(());
        }
        if self.cursor != Some(point) {
            self.flush_pending()?;
            let x = u16::try_from(point.x)?;
            let y = u16::try_from(point.y)?;
            queue!(self.out, MoveTo(x, y))?;
            self.stats.moves += 1;
        }
        if self.style != Some(cell.style) {
            self.flush_pending()?;
            self.set_style(cell.style)?;
        }
        self.pending.push(cell.rune);
        self.stats.cells_printed += 1;
        self.cursor = Some(Point::new(point.x + i32::from(cell.width), point.y));
        Ok(())
    }

    /// Emit whatever is pending, reset attributes and flush the writer.
    pub fn finish(mut self) -> Result<(W, BatchStats)> {
        self.flush_pending()?;
        if self.style.is_some() {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
        }
        self.out.flush()?;
        Ok((self.out, self.stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::Color;

    fn plain(r: char) -> Cell {
        Cell::leader(r, 1, Style::new())
    }

    #[test]
    fn batches_adjacent_cells_with_same_style() {
        let mut w = BatchWriter::new(Vec::new(), ColorMode::Color256);
        for (x, r) in "abc".chars().enumerate() {
            w.put(Point::new(x as i32, 0), plain(r)).unwrap();
        }
        let (bytes, stats) = w.finish().unwrap();
        assert_eq!(stats.print_commands, 1);
        assert_eq!(stats.cells_printed, 3);
        assert_eq!(stats.moves, 1);
        assert!(String::from_utf8(bytes).unwrap().contains("abc"));
    }

    #[test]
    fn gap_or_style_change_splits_batch() {
        let mut w = BatchWriter::new(Vec::new(), ColorMode::Color256);
        w.put(Point::new(0, 0), plain('a')).unwrap();
        w.put(Point::new(2, 0), plain('b')).unwrap();
        let red = Cell::leader('c', 1, Style::new().fg(Color::Red));
        w.put(Point::new(3, 0), red).unwrap();
        let (_, stats) = w.finish().unwrap();
        assert_eq!(stats.print_commands, 3);
        assert_eq!(stats.moves, 2);
        assert!(stats.print_commands <= stats.cells_printed);
    }

    #[test]
    fn wide_rune_advances_cursor_by_two() {
        let mut w = BatchWriter::new(Vec::new(), ColorMode::Color256);
        w.put(Point::new(0, 0), Cell::leader('世', 2, Style::new()))
            .unwrap();
        w.put(Point::new(1, 0), Cell::continuation(Style::new()))
            .unwrap();
        w.put(Point::new(2, 0), plain('x')).unwrap();
        let (_, stats) = w.finish().unwrap();
        assert_eq!(stats.moves, 1);
        assert_eq!(stats.cells_printed, 2);
    }
}
