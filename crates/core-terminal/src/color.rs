//! Color mode selection and conversion.
//!
//! Widgets pick colors freely; the display maps them onto what the active
//! mode can show before emitting escape sequences.

use core_model::Color;
use crossterm::style::Color as CColor;

/// Output color capability of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// The eight basic ANSI colors.
    Normal,
    /// xterm 256-color palette.
    #[default]
    Color256,
    /// The 24-step gray ramp of the 256-color palette.
    Grayscale,
    /// 24-bit RGB.
    TrueColor,
}

const BASIC: [(Color, (u8, u8, u8)); 8] = [
    (Color::Black, (0, 0, 0)),
    (Color::Red, (205, 0, 0)),
    (Color::Green, (0, 205, 0)),
    (Color::Yellow, (205, 205, 0)),
    (Color::Blue, (0, 0, 238)),
    (Color::Magenta, (205, 0, 205)),
    (Color::Cyan, (0, 205, 205)),
    (Color::White, (229, 229, 229)),
];

const BRIGHT: [(u8, u8, u8); 8] = [
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Approximate RGB value of any color; `None` for the terminal default.
pub fn rgb_of(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Default => None,
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Indexed(i) => Some(indexed_rgb(i)),
        named => named.palette_index().map(indexed_rgb),
    }
}

fn indexed_rgb(i: u8) -> (u8, u8, u8) {
    match i {
        0..=7 => BASIC[i as usize].1,
        8..=15 => BRIGHT[(i - 8) as usize],
        16..=231 => {
            let n = i - 16;
            (
                CUBE[(n / 36) as usize],
                CUBE[(n / 6 % 6) as usize],
                CUBE[(n % 6) as usize],
            )
        }
        _ => {
            let v = 8 + (i - 232) * 10;
            (v, v, v)
        }
    }
}

fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (i32::from(x) - i32::from(y)).unsigned_abs();
    d(a.0, b.0).pow(2) + d(a.1, b.1).pow(2) + d(a.2, b.2).pow(2)
}

fn nearest_cube_level(v: u8) -> usize {
    CUBE.iter()
        .enumerate()
        .min_by_key(|(_, c)| (i32::from(**c) - i32::from(v)).unsigned_abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn gray_index(v: u8) -> u8 {
    232 + (v.saturating_sub(8) / 10).min(23)
}

/// Closest xterm 256-color palette index for an RGB triple, choosing
/// between the color cube and the gray ramp.
pub fn rgb_to_256(rgb: (u8, u8, u8)) -> u8 {
    let (r, g, b) = (
        nearest_cube_level(rgb.0),
        nearest_cube_level(rgb.1),
        nearest_cube_level(rgb.2),
    );
    let cube = 16 + 36 * r as u8 + 6 * g as u8 + b as u8;
    let avg = ((u32::from(rgb.0) + u32::from(rgb.1) + u32::from(rgb.2)) / 3) as u8;
    let gray = gray_index(avg);
    if distance(indexed_rgb(gray), rgb) < distance(indexed_rgb(cube), rgb) {
        gray
    } else {
        cube
    }
}

impl ColorMode {
    /// Map `color` onto a color this mode can display.
    pub fn convert(self, color: Color) -> Color {
        let Some(rgb) = rgb_of(color) else {
            return Color::Default;
        };
        match self {
            ColorMode::TrueColor => color,
            ColorMode::Color256 => match color {
                Color::Rgb(..) => Color::Indexed(rgb_to_256(rgb)),
                other => other,
            },
            ColorMode::Grayscale => {
                let lum = (u32::from(rgb.0) * 299 + u32::from(rgb.1) * 587 + u32::from(rgb.2) * 114)
                    / 1000;
                Color::Indexed(gray_index(lum as u8))
            }
            ColorMode::Normal => match color.palette_index() {
                Some(i) if i < 8 => color,
                _ => BASIC
                    .iter()
                    .min_by_key(|(_, basic)| distance(*basic, rgb))
                    .map(|(c, _)| *c)
                    .unwrap_or(Color::Default),
            },
        }
    }

    /// Convert and translate into the crossterm representation.
    pub fn to_crossterm(self, color: Color) -> CColor {
        match self.convert(color) {
            Color::Default => CColor::Reset,
            Color::Black => CColor::Black,
            Color::Red => CColor::DarkRed,
            Color::Green => CColor::DarkGreen,
            Color::Yellow => CColor::DarkYellow,
            Color::Blue => CColor::DarkBlue,
            Color::Magenta => CColor::DarkMagenta,
            Color::Cyan => CColor::DarkCyan,
            Color::White => CColor::Grey,
            Color::Indexed(i) => CColor::AnsiValue(i),
            Color::Rgb(r, g, b) => CColor::Rgb { r, g, b },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stays_default_in_every_mode() {
        for mode in [
            ColorMode::Normal,
            ColorMode::Color256,
            ColorMode::Grayscale,
            ColorMode::TrueColor,
        ] {
            assert_eq!(mode.convert(Color::Default), Color::Default);
            assert_eq!(mode.to_crossterm(Color::Default), CColor::Reset);
        }
    }

    #[test]
    fn rgb_maps_into_cube_for_256() {
        assert_eq!(ColorMode::Color256.convert(Color::Rgb(255, 0, 0)), Color::Indexed(196));
        assert_eq!(ColorMode::Color256.convert(Color::Rgb(0, 0, 0)), Color::Indexed(16));
        assert_eq!(ColorMode::Color256.convert(Color::Blue), Color::Blue);
    }

    #[test]
    fn mid_gray_prefers_gray_ramp() {
        let idx = rgb_to_256((128, 128, 128));
        assert!((232..=255).contains(&idx), "got {idx}");
    }

    #[test]
    fn normal_mode_picks_nearest_basic() {
        assert_eq!(ColorMode::Normal.convert(Color::Rgb(250, 10, 10)), Color::Red);
        assert_eq!(ColorMode::Normal.convert(Color::Indexed(21)), Color::Blue);
        assert_eq!(ColorMode::Normal.convert(Color::Green), Color::Green);
    }

    #[test]
    fn grayscale_lands_on_ramp() {
        match ColorMode::Grayscale.convert(Color::Rgb(10, 200, 30)) {
            Color::Indexed(i) => assert!(i >= 232),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn truecolor_passes_rgb_through() {
        assert_eq!(
            ColorMode::TrueColor.to_crossterm(Color::Rgb(1, 2, 3)),
            CColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
