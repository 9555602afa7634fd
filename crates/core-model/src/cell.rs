//! Terminal cell values.
//!
//! A `Cell` is a plain value: two cells compare equal exactly when drawing
//! one over the other would leave the screen unchanged. The diff renderer
//! relies on this to decide which positions to flush.
//!
//! Wide runes occupy a leader cell (`width == 2`) followed by a continuation
//! cell (`width == 0`, rune `'\0'`). Continuations never print; they exist so
//! that overwriting either half of a wide rune is visible to the diff.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        const BOLD      = 0b0000_0001;
        const ITALIC    = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const REVERSE   = 0b0000_1000;
        const DIM       = 0b0001_0000;
        const BLINK     = 0b0010_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Terminal default foreground / background.
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// xterm 256-color palette index.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    /// Map named colors onto their 16-color palette slots.
    pub fn palette_index(&self) -> Option<u8> {
        match self {
            Color::Default => None,
            Color::Black => Some(0),
            Color::Red => Some(1),
            Color::Green => Some(2),
            Color::Yellow => Some(3),
            Color::Blue => Some(4),
            Color::Magenta => Some(5),
            Color::Cyan => Some(6),
            Color::White => Some(7),
            Color::Indexed(i) => Some(*i),
            Color::Rgb(..) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: Color::Default,
            bg: Color::Default,
            attrs: Attrs::empty(),
        }
    }

    pub const fn fg(mut self, c: Color) -> Self {
        self.fg = c;
        self
    }

    pub const fn bg(mut self, c: Color) -> Self {
        self.bg = c;
        self
    }

    pub fn attrs(mut self, a: Attrs) -> Self {
        self.attrs |= a;
        self
    }

    pub fn bold(self) -> Self {
        self.attrs(Attrs::BOLD)
    }

    pub fn underline(self) -> Self {
        self.attrs(Attrs::UNDERLINE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub rune: char,
    /// Display width: 1 or 2 for leaders, 0 for continuations.
    pub width: u8,
    pub style: Style,
}

impl Cell {
    #[inline]
    pub fn leader(rune: char, width: u8, style: Style) -> Self {
        Self {
            rune,
            width: width.clamp(1, 2),
            style,
        }
    }

    #[inline]
    pub fn continuation(style: Style) -> Self {
        Self {
            rune: '\0',
            width: 0,
            style,
        }
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            rune: ' ',
            width: 1,
            style: Style::new(),
        }
    }
}

/// Box drawing set used for borders and separator lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    None,
    #[default]
    Light,
    Double,
    Round,
}

/// Runes for one line style, indexed by the part being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRunes {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
}

impl LineStyle {
    pub fn runes(&self) -> Option<LineRunes> {
        match self {
            LineStyle::None => None,
            LineStyle::Light => Some(LineRunes {
                horizontal: '─',
                vertical: '│',
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
            }),
            LineStyle::Double => Some(LineRunes {
                horizontal: '═',
                vertical: '║',
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
            }),
            LineStyle::Round => Some(LineRunes {
                horizontal: '─',
                vertical: '│',
                top_left: '╭',
                top_right: '╮',
                bottom_left: '╰',
                bottom_right: '╯',
            }),
        }
    }
}
