//! RGB color triples.
//!
//! Channels live in the 0.0..=1.0 range. With the `serde` feature a color
//! serializes as a plain `[r, g, b]` array.

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 3]", into = "[f64; 3]"))]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5);

    /// Create a color from 0..=1 channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: core::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::from_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Look up a basic color name (`red`, `k`, `white`, ...).
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "black" | "k" => Self::BLACK,
            "white" | "w" => Self::WHITE,
            "red" | "r" => Self::new(1.0, 0.0, 0.0),
            "green" | "g" => Self::new(0.0, 1.0, 0.0),
            "blue" | "b" => Self::new(0.0, 0.0, 1.0),
            "cyan" | "c" => Self::new(0.0, 1.0, 1.0),
            "magenta" | "m" => Self::new(1.0, 0.0, 1.0),
            "yellow" | "y" => Self::new(1.0, 1.0, 0.0),
            "gray" | "grey" => Self::GRAY,
            _ => return None,
        };
        Some(color)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// True when every channel is finite and inside 0..=1.
    pub fn is_valid(self) -> bool {
        self.to_array()
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// Scale every channel toward black by `amount` (0 = unchanged, 1 = black).
    pub fn darken(self, amount: f64) -> Self {
        let k = 1.0 - amount.clamp(0.0, 1.0);
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    /// Linear blend toward `other`; `t = 0` keeps `self`, `t = 1` yields `other`.
    pub fn blend(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Perceived luminance (Rec. 601 weights).
    pub fn luminance(self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[f64; 3]> for Rgb {
    fn from(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}
