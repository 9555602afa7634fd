//! Reference widgets placed in a live container and rendered.

use core_container::{
    Container, ContainerOption, SplitPolicy, place_widget, split_horizontal,
};
use core_events::{Key, KeyboardEvent};
use core_model::{Canvas, Color, LineStyle, Point, Size};
use core_render::RenderEngine;
use core_terminal::fake::FakeDisplay;
use core_widget::{KeyScope, Meta, Widget, WidgetOptions};
use dash_widgets::{Gauge, GaugeOptions, Mirror};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

#[test]
fn mirror_reports_key_with_focus_prefix_after_render() {
    let (mut display, _inject) = FakeDisplay::new(Size::new(12, 8));
    let probe = display.probe();
    let top = Arc::new(Mirror::new(WidgetOptions {
        keyboard: KeyScope::Focused,
        ..WidgetOptions::default()
    }));
    let bottom = Arc::new(Mirror::new(WidgetOptions {
        keyboard: KeyScope::Global,
        ..WidgetOptions::default()
    }));
    let mut c = Container::with_size(
        Size::new(12, 8),
        vec![split_horizontal(
            vec![place_widget(top)],
            vec![place_widget(bottom)],
            SplitPolicy::Percent(50),
        )],
    )
    .unwrap();
    c.handle_keyboard(&KeyboardEvent::new(Key::Enter));
    c.handle_keyboard(&KeyboardEvent::new(Key::End));
    RenderEngine::new().render(&mut c, &mut display).unwrap();

    assert_eq!(probe.row(1), "│(12,4)    │");
    assert_eq!(probe.row(2), "│F:KeyEnd  │");
    assert_eq!(probe.row(3), "└──────────┘");
    assert_eq!(probe.row(5), "│(12,4)    │");
    assert_eq!(probe.row(6), "│KeyEnd    │");
}

#[test]
fn gauge_with_height_cap_leaves_rest_blank() {
    let (mut display, _inject) = FakeDisplay::new(Size::new(10, 6));
    let probe = display.probe();
    let gauge = Arc::new(
        Gauge::new(GaugeOptions::default().height(1).hide_progress_text()).unwrap(),
    );
    gauge.percent(100).unwrap();
    let mut c = Container::with_size(
        Size::new(10, 6),
        vec![
            ContainerOption::Border(LineStyle::Light),
            place_widget(gauge),
        ],
    )
    .unwrap();
    RenderEngine::new().render(&mut c, &mut display).unwrap();
    let screen = probe.screen();
    let bg = |x, y| screen.cell(Point::new(x, y)).unwrap().style.bg;
    assert_eq!(bg(1, 1), Color::Green);
    assert_eq!(bg(8, 1), Color::Green);
    assert_eq!(bg(1, 2), Color::Default);
}

/// Mutators and `draw` share the gauge's lock; concurrent updates never
/// produce a torn frame.
#[test]
fn gauge_updates_from_other_threads_while_drawing() {
    let gauge = Arc::new(Gauge::new(GaugeOptions::default().hide_progress_text()).unwrap());
    let writers: Vec<_> = (0..4)
        .map(|i| {
            let g = gauge.clone();
            thread::spawn(move || {
                for step in 0..200 {
                    let p = if (step + i) % 2 == 0 { 0 } else { 100 };
                    g.percent(p).unwrap();
                }
            })
        })
        .collect();

    let meta = Meta {
        focused: false,
        id: None,
    };
    for _ in 0..200 {
        let mut c = Canvas::new(Size::new(20, 1));
        gauge.draw(&mut c, &meta).unwrap();
        let filled = c
            .cells()
            .iter()
            .filter(|cell| cell.style.bg == Color::Green)
            .count();
        assert!(filled == 0 || filled == 20, "torn frame with {filled} cells");
    }
    for w in writers {
        w.join().unwrap();
    }
}

proptest! {
    #[test]
    fn filled_cells_never_exceed_width(done in 0i32..=50, extra in 0i32..50, width in 1i32..60) {
        let total = done + extra.max(1);
        let g = Gauge::new(GaugeOptions::default().hide_progress_text()).unwrap();
        g.absolute(done, total).unwrap();
        let mut c = Canvas::new(Size::new(width, 1));
        g.draw(&mut c, &Meta { focused: false, id: None }).unwrap();
        let filled = c.cells().iter().filter(|cell| cell.style.bg == Color::Green).count() as i64;
        prop_assert_eq!(filled, i64::from(width) * i64::from(done) / i64::from(total));
    }
}
