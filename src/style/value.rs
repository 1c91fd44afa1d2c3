//! Property value types: Color, Length, and the layout/font keyword enums.

use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color with straight (non-premultiplied) f32 channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 0.5, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);

    /// Opaque color from channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from channels with alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse `rgb`, `rgba`, `rrggbb` or `rrggbbaa` hex digits (no leading `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 | 4 => {
                let a = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
                Some(Self::from_rgba8(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, a))
            }
            6 | 8 => {
                let a = if hex.len() == 8 { pair(6)? } else { 255 };
                Some(Self::from_rgba8(pair(0)?, pair(2)?, pair(4)?, a))
            }
            _ => None,
        }
    }

    /// Look up a named color.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "transparent" => Some(Self::TRANSPARENT),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "gray" | "grey" => Some(Self::GRAY),
            _ => None,
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

/// A length with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Logical pixels.
    Px(f32),
    /// Percentage (0..100) of the parent dimension.
    Percent(f32),
    /// Percentage of the viewport width.
    Vw(f32),
    /// Percentage of the viewport height.
    Vh(f32),
    /// Leave the size to the layout solver.
    Auto,
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    /// The numeric part, `None` for `Auto`.
    pub fn value(&self) -> Option<f32> {
        match *self {
            Length::Px(v) | Length::Percent(v) | Length::Vw(v) | Length::Vh(v) => Some(v),
            Length::Auto => None,
        }
    }

    /// Returns `true` for `Auto`.
    pub fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Whether two lengths share a unit (and can therefore be interpolated).
    pub fn same_unit(&self, other: &Length) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Replace the numeric part, keeping the unit.
    pub(crate) fn with_value(&self, v: f32) -> Length {
        match self {
            Length::Px(_) => Length::Px(v),
            Length::Percent(_) => Length::Percent(v),
            Length::Vw(_) => Length::Vw(v),
            Length::Vh(_) => Length::Vh(v),
            Length::Auto => Length::Auto,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::ZERO
    }
}

impl From<f32> for Length {
    fn from(px: f32) -> Self {
        Length::Px(px)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Percent(v) => write!(f, "{v}%"),
            Length::Vw(v) => write!(f, "{v}vw"),
            Length::Vh(v) => write!(f, "{v}vh"),
            Length::Auto => write!(f, "auto"),
        }
    }
}

// ---------------------------------------------------------------------------
// Keyword enums
// ---------------------------------------------------------------------------

/// Whether a node takes part in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Flex,
    None,
}

/// Main axis of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
    RowReverse,
    ColumnReverse,
}

/// Cross-axis alignment of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    End,
    Center,
    Stretch,
    Baseline,
}

/// Main-axis distribution of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Relative,
    Absolute,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    Bold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_six_digits() {
        let c = Color::from_hex("ff0080").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn hex_short_and_alpha() {
        assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
        let c = Color::from_hex("00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(Color::from_hex("0000"), Some(Color::TRANSPARENT));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(Color::from_hex("zzz"), None);
        assert_eq!(Color::from_hex("12345"), None);
    }

    #[test]
    fn named_colors() {
        assert_eq!(Color::named("grey"), Some(Color::GRAY));
        assert_eq!(Color::named("chartreuse"), None);
    }

    #[test]
    fn length_units() {
        assert!(Length::Px(1.0).same_unit(&Length::Px(9.0)));
        assert!(!Length::Px(1.0).same_unit(&Length::Percent(1.0)));
        assert_eq!(Length::Percent(5.0).with_value(7.0), Length::Percent(7.0));
        assert_eq!(Length::Auto.value(), None);
        assert_eq!(Length::from(3.0), Length::Px(3.0));
    }

    #[test]
    fn length_display() {
        assert_eq!(Length::Px(4.0).to_string(), "4px");
        assert_eq!(Length::Percent(50.0).to_string(), "50%");
        assert_eq!(Length::Auto.to_string(), "auto");
    }
}
