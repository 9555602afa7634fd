//! Cell-by-cell comparison of two frames.
//!
//! A missing or differently sized previous frame yields every cell of the
//! next one, which is what a freshly cleared terminal needs.

use core_model::{Canvas, CellChange, Point};

pub fn diff_canvas(prev: Option<&Canvas>, next: &Canvas) -> Vec<CellChange> {
    let width = next.size().width.max(1) as usize;
    let changed = |i: usize| match prev {
        Some(p) if p.size() == next.size() => p.cells()[i] != next.cells()[i],
        _ => true,
    };
    next.cells()
        .iter()
        .enumerate()
        .filter(|(i, _)| changed(*i))
        .map(|(i, cell)| CellChange {
            point: Point::new((i % width) as i32, (i / width) as i32),
            cell: *cell,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{Size, Style};

    #[test]
    fn cold_start_is_full_frame() {
        let next = Canvas::new(Size::new(3, 2));
        assert_eq!(diff_canvas(None, &next).len(), 6);
    }

    #[test]
    fn size_change_is_full_frame() {
        let prev = Canvas::new(Size::new(2, 2));
        let next = Canvas::new(Size::new(3, 2));
        assert_eq!(diff_canvas(Some(&prev), &next).len(), 6);
    }

    #[test]
    fn only_changed_cells_are_reported() {
        let prev = Canvas::new(Size::new(4, 2));
        let mut next = prev.clone();
        next.set_cell(Point::new(2, 1), 'x', Style::new()).unwrap();
        let changes = diff_canvas(Some(&prev), &next);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].point, Point::new(2, 1));
        assert_eq!(changes[0].cell.rune, 'x');
    }
}
