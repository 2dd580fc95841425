//! Hover highlight colors.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HighlightColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HighlightColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const AMBER: HighlightColor = HighlightColor::rgb(255, 183, 3);
    pub const TEAL: HighlightColor = HighlightColor::rgb(0, 180, 170);
    pub const CORAL: HighlightColor = HighlightColor::rgb(255, 111, 97);
    pub const VIOLET: HighlightColor = HighlightColor::rgb(140, 90, 220);
    pub const LIME: HighlightColor = HighlightColor::rgb(150, 210, 40);
    pub const SKY: HighlightColor = HighlightColor::rgb(70, 160, 255);
    pub const ROSE: HighlightColor = HighlightColor::rgb(235, 80, 160);
    pub const GOLD: HighlightColor = HighlightColor::rgb(212, 175, 55);

    /// Colors handed out before falling back to random hues.
    pub fn palette() -> Vec<HighlightColor> {
        vec![
            Self::AMBER,
            Self::TEAL,
            Self::CORAL,
            Self::VIOLET,
            Self::LIME,
            Self::SKY,
            Self::ROSE,
            Self::GOLD,
        ]
    }

    /// Fully saturated color from a hue in degrees.
    pub fn from_hue(hue: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let x = 1.0 - (h % 2.0 - 1.0).abs();
        let (r, g, b) = match h as u32 {
            0 => (1.0, x, 0.0),
            1 => (x, 1.0, 0.0),
            2 => (0.0, 1.0, x),
            3 => (0.0, x, 1.0),
            4 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        let to_u8 = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Hands out one highlight color per hotspot.
///
/// The fixed palette is used first; after that colors come from a seeded
/// RNG so that two runs with the same seed assign the same colors.
#[derive(Debug, Clone)]
pub struct HighlightPalette {
    rng: ChaCha8Rng,
    next: usize,
}

impl HighlightPalette {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next: 0,
        }
    }

    pub fn next_color(&mut self) -> HighlightColor {
        let palette = HighlightColor::palette();
        let color = if let Some(color) = palette.get(self.next) {
            *color
        } else {
            HighlightColor::from_hue(self.rng.random_range(0.0..360.0))
        };
        self.next += 1;
        color
    }
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self::new(12345)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_first_then_random() {
        let mut palette = HighlightPalette::new(7);
        let fixed = HighlightColor::palette();
        for expected in &fixed {
            assert_eq!(palette.next_color(), *expected);
        }
        let extra = palette.next_color();
        assert_eq!(extra.a, 255);
    }

    #[test]
    fn test_seeded_colors_are_deterministic() {
        let mut a = HighlightPalette::new(99);
        let mut b = HighlightPalette::new(99);
        for _ in 0..20 {
            assert_eq!(a.next_color(), b.next_color());
        }
    }

    #[test]
    fn test_from_hue_primaries() {
        assert_eq!(HighlightColor::from_hue(0.0), HighlightColor::rgb(255, 0, 0));
        assert_eq!(HighlightColor::from_hue(120.0), HighlightColor::rgb(0, 255, 0));
        assert_eq!(HighlightColor::from_hue(240.0), HighlightColor::rgb(0, 0, 255));
    }
}
