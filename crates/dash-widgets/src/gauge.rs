//! Progress bar with an optional border, label and threshold line.
//!
//! Progress is either a percentage or `done / total`. The filled part of the
//! bar covers `floor(width * done / total)` cells of the usable area. The
//! progress text (`"40%"` or `"7/10"`, followed by `" (label)"` when a label
//! is set) is drawn over the bar, coloured by whether each rune sits on the
//! filled or the empty part.
//!
//! State lives behind a mutex taken by both the mutators and `draw`, so a
//! gauge can be updated from any thread while the run loop draws it.

use core_model::area::exclude_border;
use core_model::{
    Canvas, Color, HAlign, LineStyle, Point, Rect, Size, Style, VAlign, align_text, rune_width,
    str_width,
};
use core_render::draw;
use core_widget::{Meta, Widget, WidgetError, WidgetOptions};
use std::sync::{Mutex, MutexGuard};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeOptions {
    pub border: LineStyle,
    pub border_style: Style,
    pub border_title: String,
    pub border_title_align: HAlign,
    pub label: String,
    pub hide_progress_text: bool,
    /// Rune the filled part is drawn with.
    pub fill: char,
    /// Background of the filled part.
    pub color: Color,
    pub filled_text_color: Color,
    pub empty_text_color: Color,
    pub text_halign: HAlign,
    pub text_valign: VAlign,
    /// Maximum bar height in cells, border excluded. 0 means unbounded.
    pub height: i32,
    /// Position of the threshold line in progress units. 0 disables it.
    pub threshold: i32,
    pub threshold_line: LineStyle,
    pub threshold_style: Style,
}

impl Default for GaugeOptions {
    fn default() -> Self {
        Self {
            border: LineStyle::None,
            border_style: Style::new(),
            border_title: String::new(),
            border_title_align: HAlign::Left,
            label: String::new(),
            hide_progress_text: false,
            fill: ' ',
            color: Color::Green,
            filled_text_color: Color::Black,
            empty_text_color: Color::Default,
            text_halign: HAlign::Center,
            text_valign: VAlign::Middle,
            height: 0,
            threshold: 0,
            threshold_line: LineStyle::Light,
            threshold_style: Style::new(),
        }
    }
}

impl GaugeOptions {
    pub fn border(mut self, line: LineStyle) -> Self {
        self.border = line;
        self
    }

    pub fn border_title(mut self, title: impl Into<String>) -> Self {
        self.border_title = title.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn fill(mut self, fill: char) -> Self {
        self.fill = fill;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    pub fn threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn hide_progress_text(mut self) -> Self {
        self.hide_progress_text = true;
        self
    }

    fn validate(&self) -> Result<(), WidgetError> {
        if self.height < 0 {
            return Err(WidgetError::InvalidArgument(format!(
                "gauge height must be zero or positive, got {}",
                self.height
            )));
        }
        if self.threshold < 0 {
            return Err(WidgetError::InvalidArgument(format!(
                "gauge threshold must be zero or positive, got {}",
                self.threshold
            )));
        }
        if rune_width(self.fill) != 1 {
            return Err(WidgetError::InvalidArgument(
                "gauge fill rune must be one cell wide".into(),
            ));
        }
        Ok(())
    }

    fn has_border(&self) -> bool {
        self.border != LineStyle::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Percent(i32),
    Absolute { done: i32, total: i32 },
}

impl Progress {
    fn done(&self) -> i32 {
        match *self {
            Progress::Percent(p) => p,
            Progress::Absolute { done, .. } => done,
        }
    }

    fn total(&self) -> i32 {
        match *self {
            Progress::Percent(_) => 100,
            Progress::Absolute { total, .. } => total,
        }
    }
}

#[derive(Debug)]
struct State {
    progress: Progress,
    opts: GaugeOptions,
}

#[derive(Debug)]
pub struct Gauge {
    state: Mutex<State>,
}

impl Gauge {
    pub fn new(opts: GaugeOptions) -> Result<Self, WidgetError> {
        opts.validate()?;
        Ok(Self {
            state: Mutex::new(State {
                progress: Progress::Percent(0),
                opts,
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, WidgetError> {
        self.state
            .lock()
            .map_err(|_| WidgetError::Failed("gauge state poisoned".into()))
    }

    /// Set the progress to `p` percent, `0..=100`. Invalid values leave the
    /// gauge unchanged.
    pub fn percent(&self, p: i32) -> Result<(), WidgetError> {
        if !(0..=100).contains(&p) {
            return Err(WidgetError::InvalidArgument(format!(
                "invalid percentage, p({p}) must be 0 <= p <= 100"
            )));
        }
        self.lock()?.progress = Progress::Percent(p);
        trace!(target: "widget.gauge", percent = p, "progress_updated");
        Ok(())
    }

    /// Set the progress to `done` out of `total`. Requires `total >= 1` and
    /// `0 <= done <= total`; invalid values leave the gauge unchanged.
    pub fn absolute(&self, done: i32, total: i32) -> Result<(), WidgetError> {
        if done < 0 || total < 1 || done > total {
            return Err(WidgetError::InvalidArgument(format!(
                "invalid progress, done({done}) must be <= total({total}), done must be zero or \
                 positive and total must be a non-zero positive number"
            )));
        }
        self.lock()?.progress = Progress::Absolute { done, total };
        trace!(target: "widget.gauge", done, total, "progress_updated");
        Ok(())
    }

    pub fn set_label(&self, label: impl Into<String>) -> Result<(), WidgetError> {
        self.lock()?.opts.label = label.into();
        Ok(())
    }

    fn min_size(opts: &GaugeOptions) -> Size {
        if opts.has_border() {
            Size::new(3, 3)
        } else {
            Size::new(1, 1)
        }
    }
}

/// Column count representing `value` out of `total` across `width` cells.
fn scaled(width: i32, value: i32, total: i32) -> i32 {
    if total <= 0 {
        return 0;
    }
    (i64::from(width) * i64::from(value) / i64::from(total)) as i32
}

impl State {
    fn text(&self) -> String {
        let mut out = String::new();
        if !self.opts.hide_progress_text {
            out = match self.progress {
                Progress::Percent(p) => format!("{p}%"),
                Progress::Absolute { done, total } => format!("{done}/{total}"),
            };
        }
        if !self.opts.label.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("({})", self.opts.label));
        }
        out
    }

    fn usable(&self, canvas: &Canvas) -> Rect {
        if self.opts.has_border() {
            exclude_border(&canvas.area())
        } else {
            canvas.area()
        }
    }

    fn draw_threshold(&self, canvas: &mut Canvas, usable: Rect) -> Result<(), WidgetError> {
        let total = self.progress.total();
        let t = self.opts.threshold;
        if t <= 0 || t >= total {
            return Ok(());
        }
        let Some(runes) = self.opts.threshold_line.runes() else {
            return Ok(());
        };
        let x = usable.min.x + scaled(usable.width(), t, total);
        for y in usable.min.y..usable.max.y {
            canvas.set_cell(Point::new(x, y), runes.vertical, self.opts.threshold_style)?;
        }
        Ok(())
    }

    fn draw_text(&self, canvas: &mut Canvas, usable: Rect, bar: Rect) -> Result<(), WidgetError> {
        let text = self.text();
        if text.is_empty() {
            return Ok(());
        }
        let trimmed = draw::trim_text(&text, usable.width() as usize, true);
        let mut cur = align_text(
            &usable,
            str_width(&trimmed) as i32,
            self.opts.text_halign,
            self.opts.text_valign,
        );
        for r in trimmed.chars() {
            if !usable.contains(cur) {
                break;
            }
            let next = Point::new(cur.x + 1, cur.y);
            // A wide rune straddling the bar edge gets the bar extended under it.
            if rune_width(r) == 2 && usable.contains(next) && bar.contains(cur) && !bar.contains(next)
            {
                let fixup = Rect::new(next.x, usable.min.y, next.x + 1, usable.max.y);
                draw::rectangle(canvas, fixup, self.opts.fill, Style::new().bg(self.opts.color))?;
            }
            let fg = if bar.contains(cur) {
                self.opts.filled_text_color
            } else {
                self.opts.empty_text_color
            };
            let under = canvas.cell(cur)?;
            let style = Style {
                fg,
                ..under.style
            };
            cur.x += canvas.set_cell(cur, r, style)? as i32;
        }
        Ok(())
    }
}

impl Widget for Gauge {
    fn draw(&self, canvas: &mut Canvas, _meta: &Meta<'_>) -> Result<(), WidgetError> {
        let state = self.lock()?;
        if !canvas.size().covers(Self::min_size(&state.opts)) {
            draw::resize_needed(canvas, canvas.area())?;
            return Ok(());
        }
        let opts = &state.opts;
        if opts.has_border() {
            draw::border(canvas, canvas.area(), opts.border, opts.border_style)?;
            draw::border_title(
                canvas,
                canvas.area(),
                &opts.border_title,
                opts.border_title_align,
                opts.border_style,
            )?;
        }

        let usable = state.usable(canvas);
        let filled = scaled(
            usable.width(),
            state.progress.done(),
            state.progress.total(),
        );
        let bar = Rect::new(
            usable.min.x,
            usable.min.y,
            usable.min.x + filled,
            usable.max.y,
        );
        if !bar.is_empty() {
            draw::rectangle(canvas, bar, opts.fill, Style::new().bg(opts.color))?;
        }
        state.draw_threshold(canvas, usable)?;
        state.draw_text(canvas, usable, bar)
    }

    fn options(&self) -> WidgetOptions {
        let Ok(state) = self.lock() else {
            return WidgetOptions::default();
        };
        let border = if state.opts.has_border() { 2 } else { 0 };
        WidgetOptions {
            min_size: Self::min_size(&state.opts),
            max_size: if state.opts.height > 0 {
                Size::new(0, state.opts.height + border)
            } else {
                Size::ZERO
            },
            ..WidgetOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::Cell;

    fn meta() -> Meta<'static> {
        Meta {
            focused: false,
            id: None,
        }
    }

    fn filled_cells(c: &Canvas, y: i32) -> usize {
        (0..c.size().width)
            .filter(|x| c.cell(Point::new(*x, y)).unwrap().style.bg == Color::Green)
            .count()
    }

    #[test]
    fn absolute_progress_fills_floor_of_width() {
        let g = Gauge::new(GaugeOptions::default().hide_progress_text()).unwrap();
        g.absolute(7, 10).unwrap();
        let mut c = Canvas::new(Size::new(12, 1));
        g.draw(&mut c, &meta()).unwrap();
        assert_eq!(filled_cells(&c, 0), 8);
    }

    #[test]
    fn percent_text_is_centred_over_bar() {
        let g = Gauge::new(GaugeOptions::default()).unwrap();
        g.percent(50).unwrap();
        let mut c = Canvas::new(Size::new(10, 1));
        g.draw(&mut c, &meta()).unwrap();
        assert_eq!(c.row_text(0), "   50%    ");
        let on_bar = c.cell(Point::new(3, 0)).unwrap();
        assert_eq!(on_bar.style.fg, Color::Black);
        assert_eq!(on_bar.style.bg, Color::Green);
        let off_bar = c.cell(Point::new(5, 0)).unwrap();
        assert_eq!(off_bar.style.fg, Color::Default);
        assert_eq!(off_bar.style.bg, Color::Default);
    }

    #[test]
    fn absolute_text_with_label() {
        let g = Gauge::new(GaugeOptions::default().label("disk")).unwrap();
        g.absolute(3, 4).unwrap();
        let mut c = Canvas::new(Size::new(14, 1));
        g.draw(&mut c, &meta()).unwrap();
        assert_eq!(c.row_text(0).trim(), "3/4 (disk)");
    }

    #[test]
    fn text_is_trimmed_with_ellipsis() {
        let g = Gauge::new(GaugeOptions::default().label("a very long label")).unwrap();
        g.percent(10).unwrap();
        let mut c = Canvas::new(Size::new(6, 1));
        g.draw(&mut c, &meta()).unwrap();
        assert_eq!(c.row_text(0), "10% (…");
    }

    #[test]
    fn invalid_progress_leaves_state_unchanged() {
        let g = Gauge::new(GaugeOptions::default()).unwrap();
        g.percent(30).unwrap();
        assert!(g.percent(101).is_err());
        assert!(g.percent(-1).is_err());
        assert!(g.absolute(5, 4).is_err());
        assert!(g.absolute(0, 0).is_err());
        assert!(g.absolute(-1, 4).is_err());
        let mut c = Canvas::new(Size::new(10, 1));
        g.draw(&mut c, &meta()).unwrap();
        assert_eq!(filled_cells(&c, 0), 3);
    }

    #[test]
    fn invalid_options_rejected() {
        assert!(Gauge::new(GaugeOptions::default().height(-1)).is_err());
        assert!(Gauge::new(GaugeOptions::default().threshold(-2)).is_err());
        assert!(Gauge::new(GaugeOptions::default().fill('日')).is_err());
    }

    #[test]
    fn border_title_and_threshold() {
        let g = Gauge::new(
            GaugeOptions::default()
                .border(LineStyle::Light)
                .border_title("cpu")
                .threshold(50)
                .hide_progress_text(),
        )
        .unwrap();
        g.percent(20).unwrap();
        let mut c = Canvas::new(Size::new(12, 3));
        g.draw(&mut c, &meta()).unwrap();
        assert_eq!(c.row_text(0), "┌cpu───────┐");
        // usable width 10: bar covers 2 cells, threshold at column 1 + 5.
        assert_eq!(c.row_text(1), "│     │    │");
        assert_eq!(filled_cells(&c, 1), 2);
        assert_eq!(c.row_text(2), "└──────────┘");
    }

    #[test]
    fn options_reflect_border_and_height() {
        let g = Gauge::new(GaugeOptions::default().border(LineStyle::Round).height(1)).unwrap();
        let o = g.options();
        assert_eq!(o.min_size, Size::new(3, 3));
        assert_eq!(o.max_size, Size::new(0, 3));
        let plain = Gauge::new(GaugeOptions::default()).unwrap().options();
        assert_eq!(plain.min_size, Size::new(1, 1));
        assert_eq!(plain.max_size, Size::ZERO);
    }

    #[test]
    fn too_small_canvas_draws_placeholder() {
        let g = Gauge::new(GaugeOptions::default().border(LineStyle::Light)).unwrap();
        let mut c = Canvas::new(Size::new(2, 2));
        g.draw(&mut c, &meta()).unwrap();
        assert!(c.cells().iter().any(|cell: &Cell| cell.rune == draw::RESIZE_NEEDED));
    }

    #[test]
    fn keyboard_and_mouse_unsupported() {
        use core_events::{Key, KeyboardEvent, MouseButton, MouseEvent};
        let g = Gauge::new(GaugeOptions::default()).unwrap();
        let em = core_widget::EventMeta::default();
        assert!(
            g.keyboard(&KeyboardEvent::new(Key::Enter), &em)
                .unwrap_err()
                .is_unsupported()
        );
        assert!(
            g.mouse(&MouseEvent::new(Point::ORIGIN, MouseButton::Left), &em)
                .unwrap_err()
                .is_unsupported()
        );
    }
}
