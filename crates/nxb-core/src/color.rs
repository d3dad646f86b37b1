//! Lifecycle state colours.

use std::fmt;

/// An ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    pub const LAWN_GREEN: Color = Color::rgb(0x7C, 0xFC, 0x00);
    pub const LIGHT_SALMON: Color = Color::rgb(0xFF, 0xA0, 0x7A);
    pub const LIGHT_SEA_GREEN: Color = Color::rgb(0x20, 0xB2, 0xAA);
    pub const LIGHT_GRAY: Color = Color::rgb(0xD3, 0xD3, 0xD3);
}

/// Renders as `#AARRGGBB`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

/// Colour of a lifecycle state label; light gray for unknown labels.
///
/// One-way only: colours are never mapped back to labels.
pub fn state_color(label: &str) -> Color {
    match label {
        "project" => Color::LAWN_GREEN,
        "approved" => Color::LIGHT_SALMON,
        "validated" => Color::LIGHT_SEA_GREEN,
        _ => Color::LIGHT_GRAY,
    }
}
