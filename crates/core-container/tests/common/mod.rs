#![allow(dead_code)]

use core_events::{KeyboardEvent, MouseEvent};
use core_model::Canvas;
use core_widget::{EventKind, EventMeta, KeyScope, Meta, MouseScope, Widget, WidgetError, WidgetOptions};
use std::sync::{Arc, Mutex};

/// Widget that records every event it is handed, formatted as
/// `"F:KeyEnter"` when focused or `"(x,y)ButtonLeft"` for mouse events.
pub struct Recorder {
    pub opts: WidgetOptions,
    pub fail_with: Option<WidgetError>,
    pub seen: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn new(keyboard: KeyScope, mouse: MouseScope) -> Arc<Self> {
        Arc::new(Self {
            opts: WidgetOptions {
                keyboard,
                mouse,
                ..WidgetOptions::default()
            },
            fail_with: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn exclusive() -> Arc<Self> {
        Arc::new(Self {
            opts: WidgetOptions {
                keyboard: KeyScope::Focused,
                exclusive_keyboard_on_focus: true,
                ..WidgetOptions::default()
            },
            fail_with: None,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: WidgetError) -> Arc<Self> {
        Arc::new(Self {
            opts: WidgetOptions {
                keyboard: KeyScope::Global,
                ..WidgetOptions::default()
            },
            fail_with: Some(error),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn push(&self, focused: bool, text: String) -> Result<(), WidgetError> {
        let prefix = if focused { "F:" } else { "" };
        self.seen.lock().unwrap().push(format!("{prefix}{text}"));
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Widget for Recorder {
    fn draw(&self, _canvas: &mut Canvas, _meta: &Meta<'_>) -> Result<(), WidgetError> {
        Ok(())
    }

    fn keyboard(&self, event: &KeyboardEvent, meta: &EventMeta) -> Result<(), WidgetError> {
        if self.opts.keyboard == KeyScope::None {
            return Err(WidgetError::Unsupported(EventKind::Keyboard));
        }
        self.push(meta.focused, event.to_string())
    }

    fn mouse(&self, event: &MouseEvent, meta: &EventMeta) -> Result<(), WidgetError> {
        if self.opts.mouse == MouseScope::None {
            return Err(WidgetError::Unsupported(EventKind::Mouse));
        }
        self.push(meta.focused, event.to_string())
    }

    fn options(&self) -> WidgetOptions {
        self.opts
    }
}
