use core_model::{Canvas, Point, Size, Style};
use core_render::diff_canvas;
use proptest::prelude::*;

fn scribble(size: Size, writes: &[(i32, i32, char)]) -> Canvas {
    let mut c = Canvas::new(size);
    for &(x, y, r) in writes {
        let _ = c.set_cell(Point::new(x, y), r, Style::new());
    }
    c
}

proptest! {
    #[test]
    fn identical_frames_produce_no_changes(
        w in 1i32..30,
        h in 1i32..10,
        writes in prop::collection::vec((0i32..30, 0i32..10, prop::char::range('a', 'z')), 0..40),
    ) {
        let frame = scribble(Size::new(w, h), &writes);
        prop_assert!(diff_canvas(Some(&frame), &frame.clone()).is_empty());
    }

    #[test]
    fn applying_changes_reproduces_next_frame(
        w in 1i32..20,
        h in 1i32..8,
        a in prop::collection::vec((0i32..20, 0i32..8, prop::char::range('a', 'z')), 0..30),
        b in prop::collection::vec((0i32..20, 0i32..8, prop::char::range('a', 'z')), 0..30),
    ) {
        let size = Size::new(w, h);
        let prev = scribble(size, &a);
        let next = scribble(size, &b);
        let mut screen = prev.clone();
        for change in diff_canvas(Some(&prev), &next) {
            screen.put(change.point, change.cell).unwrap();
        }
        prop_assert_eq!(screen, next);
    }
}
