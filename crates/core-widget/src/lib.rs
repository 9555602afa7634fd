//! Widget capability contract.
//!
//! A widget is anything that can draw itself into a [`Canvas`] and, if it
//! wants to, react to keyboard and mouse events. The container stores widgets
//! as `Arc<dyn Widget>` and never knows their concrete types.
//!
//! Locking discipline: widget state is usually mutated by application code
//! on other tasks while the run loop calls `draw`. Every method here takes
//! `&self`; a widget guards its mutable state with its own lock, taken by both
//! its public mutators and `draw`/`keyboard`/`mouse`. The engine provides no
//! cross-widget locking.

use core_events::{KeyboardEvent, MouseEvent};
use core_model::{Canvas, CanvasError, Size};
use std::fmt;

/// Which keyboard events a widget receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyScope {
    #[default]
    None,
    /// Only while its container holds focus.
    Focused,
    /// Every key not consumed by the container, focused or not.
    Global,
}

/// Which mouse events a widget receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseScope {
    #[default]
    None,
    /// Events that land inside the widget's own area.
    Widget,
    /// Events anywhere inside the widget's container, including border and
    /// padding.
    Container,
    /// Every mouse event on the screen.
    Global,
}

/// Size constraints and event subscriptions reported by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WidgetOptions {
    /// Smallest canvas the widget can draw into; a smaller area renders a
    /// "resize needed" placeholder instead.
    pub min_size: Size,
    /// Largest useful canvas. Zero components are unbounded.
    pub max_size: Size,
    /// Desired width:height ratio. Zero components disable it.
    pub ratio: Size,
    pub keyboard: KeyScope,
    pub mouse: MouseScope,
    /// While focused, receive every key including focus-cycling and global
    /// container keys.
    pub exclusive_keyboard_on_focus: bool,
}

/// Context passed to `draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta<'a> {
    pub focused: bool,
    /// Id of the container holding the widget, if it was given one.
    pub id: Option<&'a str>,
}

/// Context passed to `keyboard` and `mouse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMeta {
    pub focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Keyboard,
    Mouse,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::Keyboard => "keyboard",
            EventKind::Mouse => "mouse",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// The widget does not handle this kind of event. Not an error for the
    /// distributor.
    #[error("widget does not support {0} events")]
    Unsupported(EventKind),
    #[error("canvas size {got} is smaller than the required minimum {min}")]
    TooSmall { got: Size, min: Size },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Failed(String),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

impl WidgetError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, WidgetError::Unsupported(_))
    }
}

/// Fail with `TooSmall` unless `canvas` covers `min`.
pub fn require_size(canvas: &Canvas, min: Size) -> Result<(), WidgetError> {
    let got = canvas.size();
    if got.covers(min) {
        Ok(())
    } else {
        Err(WidgetError::TooSmall { got, min })
    }
}

pub trait Widget: Send + Sync {
    /// Draw into `canvas`, whose area is the widget's usable area. The canvas
    /// is blank at the start of every frame.
    fn draw(&self, canvas: &mut Canvas, meta: &Meta<'_>) -> Result<(), WidgetError>;

    fn keyboard(&self, _event: &KeyboardEvent, _meta: &EventMeta) -> Result<(), WidgetError> {
        Err(WidgetError::Unsupported(EventKind::Keyboard))
    }

    /// `event.position` is relative to the widget's canvas, or
    /// `MouseEvent::OUTSIDE` for events outside it.
    fn mouse(&self, _event: &MouseEvent, _meta: &EventMeta) -> Result<(), WidgetError> {
        Err(WidgetError::Unsupported(EventKind::Mouse))
    }

    fn options(&self) -> WidgetOptions {
        WidgetOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::Key;
    use core_model::{Point, Style};

    struct Dot;

    impl Widget for Dot {
        fn draw(&self, canvas: &mut Canvas, _meta: &Meta<'_>) -> Result<(), WidgetError> {
            require_size(canvas, Size::new(1, 1))?;
            canvas.set_cell(Point::ORIGIN, '.', Style::new())?;
            Ok(())
        }
    }

    #[test]
    fn default_handlers_are_unsupported() {
        let w = Dot;
        let err = w
            .keyboard(&KeyboardEvent::new(Key::Enter), &EventMeta::default())
            .unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "widget does not support keyboard events");
        assert_eq!(w.options().keyboard, KeyScope::None);
    }

    #[test]
    fn require_size_rejects_small_canvas() {
        let mut empty = Canvas::new(Size::ZERO);
        let meta = Meta {
            focused: false,
            id: None,
        };
        assert!(matches!(
            Dot.draw(&mut empty, &meta),
            Err(WidgetError::TooSmall { .. })
        ));
        let mut ok = Canvas::new(Size::new(2, 1));
        Dot.draw(&mut ok, &meta).unwrap();
        assert_eq!(ok.row_text(0), ". ");
    }
}
