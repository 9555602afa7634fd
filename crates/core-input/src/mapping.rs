use core_events::{Event, Key, KeyModifiers, KeyboardEvent, MouseButton, MouseEvent};
use core_model::{Point, Size};
use crossterm::event::{
    Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers, MouseButton as CMouseButton, MouseEvent as CMouseEvent,
    MouseEventKind as CMouseKind,
};

/// Translate one crossterm event into zero or more tiledash events.
///
/// Paste payloads are replayed as individual character key presses; focus
/// reports and unsupported keys map to nothing.
pub(crate) fn map_event(event: CEvent) -> Vec<Event> {
    match event {
        CEvent::Key(key) => map_key_event(&key).map(Event::Keyboard).into_iter().collect(),
        CEvent::Mouse(mouse) => map_mouse_event(&mouse)
            .map(Event::Mouse)
            .into_iter()
            .collect(),
        CEvent::Resize(w, h) => vec![Event::Resize(Size::new(i32::from(w), i32::from(h)))],
        CEvent::Paste(data) => data
            .chars()
            .map(|c| Event::Keyboard(KeyboardEvent::new(paste_key(c))))
            .collect(),
        CEvent::FocusGained | CEvent::FocusLost => Vec::new(),
    }
}

fn paste_key(c: char) -> Key {
    match c {
        '\n' | '\r' => Key::Enter,
        '\t' => Key::Tab,
        other => Key::Char(other),
    }
}

/// Map a crossterm key press. Releases are dropped; repeats are forwarded as
/// ordinary presses.
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyboardEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let key = map_key(&event.code)?;
    let mut mods = map_mods(event.modifiers);
    if key == Key::Backtab {
        // Backtab already encodes shift.
        mods.remove(KeyModifiers::SHIFT);
    }
    if let Key::Char(c) = key
        && !c.is_ascii_alphabetic()
    {
        mods.remove(KeyModifiers::SHIFT);
    }
    Some(KeyboardEvent::with_mods(key, mods))
}

pub(crate) fn map_key(code: &CKeyCode) -> Option<Key> {
    let key = match code {
        CKeyCode::Char(c) => Key::Char(*c),
        CKeyCode::Enter => Key::Enter,
        CKeyCode::Esc => Key::Esc,
        CKeyCode::Backspace => Key::Backspace,
        CKeyCode::Tab => Key::Tab,
        CKeyCode::BackTab => Key::Backtab,
        CKeyCode::Up => Key::ArrowUp,
        CKeyCode::Down => Key::ArrowDown,
        CKeyCode::Left => Key::ArrowLeft,
        CKeyCode::Right => Key::ArrowRight,
        CKeyCode::Home => Key::Home,
        CKeyCode::End => Key::End,
        CKeyCode::PageUp => Key::PageUp,
        CKeyCode::PageDown => Key::PageDown,
        CKeyCode::Insert => Key::Insert,
        CKeyCode::Delete => Key::Delete,
        CKeyCode::F(n) => Key::F(*n),
        CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(key)
}

pub(crate) fn map_mods(m: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Map a crossterm mouse report. Drags report the held button; plain motion
/// and horizontal scrolling are dropped.
pub(crate) fn map_mouse_event(event: &CMouseEvent) -> Option<MouseEvent> {
    let button = match event.kind {
        CMouseKind::Down(b) | CMouseKind::Drag(b) => map_button(b),
        CMouseKind::Up(_) => MouseButton::Release,
        CMouseKind::ScrollUp => MouseButton::WheelUp,
        CMouseKind::ScrollDown => MouseButton::WheelDown,
        CMouseKind::Moved | CMouseKind::ScrollLeft | CMouseKind::ScrollRight => return None,
    };
    let position = Point::new(i32::from(event.column), i32::from(event.row));
    Some(MouseEvent::new(position, button))
}

fn map_button(b: CMouseButton) -> MouseButton {
    match b {
        CMouseButton::Left => MouseButton::Left,
        CMouseButton::Middle => MouseButton::Middle,
        CMouseButton::Right => MouseButton::Right,
    }
}
