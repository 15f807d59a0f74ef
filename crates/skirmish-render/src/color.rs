//! 8-bit RGBA colors used by line primitives.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const LIME_GREEN: Color = Color::rgb(50, 205, 50);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Half brightness on every color channel; alpha is kept.
    pub const fn halved(self) -> Self {
        Self {
            r: self.r / 2,
            g: self.g / 2,
            b: self.b / 2,
            a: self.a,
        }
    }

    /// Normalized `[r, g, b, a]` in `0.0..=1.0`.
    pub fn to_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}
