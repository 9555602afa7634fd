//! A widget that shows what the engine hands it.
//!
//! Inside a border it prints, one per row starting at (1,1):
//! its canvas size followed by the custom text, the last keyboard event,
//! the last mouse event and `focus` while focused. Events are prefixed with
//! `F:` when they arrived while the widget was focused. Useful for demos and
//! for asserting routing and layout in tests.
//!
//! `Esc` and the right mouse button clear the recorded events and fail, so
//! error paths can be exercised too.

use core_events::{Key, KeyboardEvent, MouseButton, MouseEvent};
use core_model::area::exclude_border;
use core_model::{Canvas, LineStyle, Point, Size, Style};
use core_render::draw::{self, Overrun};
use core_widget::{EventMeta, Meta, Widget, WidgetError, WidgetOptions, require_size};
use std::sync::{Mutex, MutexGuard};

const MIN_SIZE: Size = Size::new(3, 3);

#[derive(Debug, Default)]
struct Seen {
    text: String,
    keyboard: Option<String>,
    mouse: Option<String>,
}

#[derive(Debug)]
pub struct Mirror {
    opts: WidgetOptions,
    seen: Mutex<Seen>,
}

fn prefixed(focused: bool, event: impl std::fmt::Display) -> String {
    if focused {
        format!("F:{event}")
    } else {
        event.to_string()
    }
}

impl Mirror {
    /// `opts.min_size` is raised to at least 3x3 so the border fits.
    pub fn new(opts: WidgetOptions) -> Self {
        let min_size = Size::new(
            opts.min_size.width.max(MIN_SIZE.width),
            opts.min_size.height.max(MIN_SIZE.height),
        );
        Self {
            opts: WidgetOptions { min_size, ..opts },
            seen: Mutex::new(Seen::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Seen>, WidgetError> {
        self.seen
            .lock()
            .map_err(|_| WidgetError::Failed("mirror state poisoned".into()))
    }

    /// Text printed after the canvas size.
    pub fn set_text(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        self.lock()?.text = text.into();
        Ok(())
    }

    fn reset(&self, why: &str) -> Result<(), WidgetError> {
        let mut seen = self.lock()?;
        seen.keyboard = None;
        seen.mouse = None;
        Err(WidgetError::Failed(format!("mirror reset by {why}")))
    }
}

impl Widget for Mirror {
    fn draw(&self, canvas: &mut Canvas, meta: &Meta<'_>) -> Result<(), WidgetError> {
        require_size(canvas, MIN_SIZE)?;
        let seen = self.lock()?;
        draw::border(canvas, canvas.area(), LineStyle::Light, Style::new())?;

        let usable = exclude_border(&canvas.area());
        let size = canvas.size();
        let mut lines = vec![format!("({},{}){}", size.width, size.height, seen.text)];
        lines.extend(seen.keyboard.iter().cloned());
        lines.extend(seen.mouse.iter().cloned());
        if meta.focused {
            lines.push("focus".to_string());
        }

        for (row, line) in (usable.min.y..usable.max.y).zip(lines.iter()) {
            draw::text(
                canvas,
                Point::new(usable.min.x, row),
                line,
                Style::new(),
                Some(usable.max.x),
                Overrun::Trim,
            )?;
        }
        Ok(())
    }

    fn keyboard(&self, event: &KeyboardEvent, meta: &EventMeta) -> Result<(), WidgetError> {
        if event.key == Key::Esc {
            return self.reset("KeyEsc");
        }
        self.lock()?.keyboard = Some(prefixed(meta.focused, event));
        Ok(())
    }

    fn mouse(&self, event: &MouseEvent, meta: &EventMeta) -> Result<(), WidgetError> {
        if event.button == MouseButton::Right {
            return self.reset("ButtonRight");
        }
        self.lock()?.mouse = Some(prefixed(meta.focused, event));
        Ok(())
    }

    fn options(&self) -> WidgetOptions {
        self.opts
    }
}
