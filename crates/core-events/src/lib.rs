//! Terminal event model consumed by the container and the run loop.
//!
//! Events are backend-neutral: `core-input` translates crossterm events into
//! these types and tests construct them directly. The `Display` names
//! (`KeyEnter`, `ButtonLeft`, ...) are stable; widgets such as the mirror
//! print them verbatim.

use core_model::{Point, Size};
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc::{self, Receiver, Sender};

/// Capacity of the bounded channel between event producers and the run loop.
/// A single producer with `send().await` gets natural backpressure; nothing
/// is dropped.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Create the bounded event channel used between a display's input task and
/// its consumer.
pub fn channel() -> (Sender<Event>, Receiver<Event>) {
    mpsc::channel(EVENT_CHANNEL_CAP)
}

/// Top-level event reported by a display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Keyboard(KeyboardEvent),
    Mouse(MouseEvent),
    /// New terminal size in cells.
    Resize(Size),
    /// Backend failure; fatal to the run loop.
    Error(String),
}

impl From<KeyboardEvent> for Event {
    fn from(k: KeyboardEvent) -> Self {
        Event::Keyboard(k)
    }
}

impl From<MouseEvent> for Event {
    fn from(m: MouseEvent) -> Self {
        Event::Mouse(m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    F(u8),
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Backspace,
    Tab,
    Backtab,
    Esc,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::Char(' ') => "KeySpace",
            Key::Char(c) => return write!(f, "{c}"),
            Key::F(n) => return write!(f, "KeyF{n}"),
            Key::Insert => "KeyInsert",
            Key::Delete => "KeyDelete",
            Key::Home => "KeyHome",
            Key::End => "KeyEnd",
            Key::PageUp => "KeyPgUp",
            Key::PageDown => "KeyPgDn",
            Key::ArrowUp => "KeyArrowUp",
            Key::ArrowDown => "KeyArrowDown",
            Key::ArrowLeft => "KeyArrowLeft",
            Key::ArrowRight => "KeyArrowRight",
            Key::Enter => "KeyEnter",
            Key::Backspace => "KeyBackspace",
            Key::Tab => "KeyTab",
            Key::Backtab => "KeyBacktab",
            Key::Esc => "KeyEsc",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key name `{0}`")]
pub struct KeyParseError(pub String);

/// Parse a key from a configuration value. Accepts the display names
/// (`KeyTab`), the short forms (`Tab`, `Esc`, `F5`, `PgUp`) and single
/// characters (`q`).
impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }
        let name = s.strip_prefix("Key").unwrap_or(s);
        let key = match name.to_ascii_lowercase().as_str() {
            "space" => Key::Char(' '),
            "insert" => Key::Insert,
            "delete" | "del" => Key::Delete,
            "home" => Key::Home,
            "end" => Key::End,
            "pgup" | "pageup" => Key::PageUp,
            "pgdn" | "pagedown" => Key::PageDown,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowdown" | "down" => Key::ArrowDown,
            "arrowleft" | "left" => Key::ArrowLeft,
            "arrowright" | "right" => Key::ArrowRight,
            "enter" => Key::Enter,
            "backspace" => Key::Backspace,
            "tab" => Key::Tab,
            "backtab" => Key::Backtab,
            "esc" | "escape" => Key::Esc,
            other => {
                let n = other
                    .strip_prefix('f')
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=24).contains(n));
                match n {
                    Some(n) => Key::F(n),
                    None => return Err(KeyParseError(s.to_string())),
                }
            }
        };
        Ok(key)
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyboardEvent {
    pub key: Key,
    pub mods: KeyModifiers,
}

impl KeyboardEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            mods: KeyModifiers::empty(),
        }
    }

    pub fn with_mods(key: Key, mods: KeyModifiers) -> Self {
        Self { key, mods }
    }
}

impl From<Key> for KeyboardEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for KeyboardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// All buttons released.
    Release,
    WheelUp,
    WheelDown,
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MouseButton::Left => "ButtonLeft",
            MouseButton::Middle => "ButtonMiddle",
            MouseButton::Right => "ButtonRight",
            MouseButton::Release => "ButtonRelease",
            MouseButton::WheelUp => "ButtonWheelUp",
            MouseButton::WheelDown => "ButtonWheelDown",
        })
    }
}

/// Mouse event at a cell position. Positions are screen-relative when read
/// from a display and widget-relative once delivered to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub position: Point,
    pub button: MouseButton,
}

impl MouseEvent {
    /// Position delivered to widgets for events outside their area.
    pub const OUTSIDE: Point = Point::new(-1, -1);

    pub fn new(position: Point, button: MouseButton) -> Self {
        Self { position, button }
    }
}

impl fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.button)
    }
}
