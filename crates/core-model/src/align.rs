//! Placement of a smaller area or a line of text inside a region.

use crate::geom::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

fn h_offset(avail: i32, need: i32, h: HAlign) -> i32 {
    let slack = (avail - need).max(0);
    match h {
        HAlign::Left => 0,
        HAlign::Center => slack / 2,
        HAlign::Right => slack,
    }
}

fn v_offset(avail: i32, need: i32, v: VAlign) -> i32 {
    let slack = (avail - need).max(0);
    match v {
        VAlign::Top => 0,
        VAlign::Middle => slack / 2,
        VAlign::Bottom => slack,
    }
}

/// Position a `size` area inside `outer`. The result never exceeds `outer`.
pub fn align_rect(outer: &Rect, size: Size, h: HAlign, v: VAlign) -> Rect {
    let w = size.width.clamp(0, outer.width().max(0));
    let ht = size.height.clamp(0, outer.height().max(0));
    let origin = Point::new(
        outer.min.x + h_offset(outer.width(), w, h),
        outer.min.y + v_offset(outer.height(), ht, v),
    );
    Rect::at(origin, Size::new(w, ht))
}

/// Starting point for a single line of text `width` cells wide.
pub fn align_text(outer: &Rect, width: i32, h: HAlign, v: VAlign) -> Point {
    align_rect(outer, Size::new(width, 1), h, v).min
}
