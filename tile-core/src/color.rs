//! Color representation for tiles
//!
//! Tiles always carry concrete RGBA values: 24-bit RGB with an alpha
//! channel, where alpha 0 is fully transparent.

use serde::{Deserialize, Serialize};

/// An RGBA color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const MAGENTA: Rgba = Rgba::rgb(255, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0);

    /// Foreground every new tile starts with
    pub const DEFAULT_FOREGROUND: Rgba = Rgba::rgb(229, 229, 229);
    /// Background every new tile starts with
    pub const DEFAULT_BACKGROUND: Rgba = Rgba::BLACK;

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// RGB channels without alpha
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Channels in RGBA byte order
    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::TRANSPARENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_is_opaque() {
        let color = Rgba::rgb(10, 20, 30);
        assert!(color.is_opaque());
        assert_eq!(color.to_rgb(), (10, 20, 30));
    }

    #[test]
    fn test_transparent() {
        assert!(Rgba::TRANSPARENT.is_transparent());
        assert!(Rgba::MAGENTA.with_alpha(0).is_transparent());
        assert_eq!(Rgba::MAGENTA.with_alpha(0).to_rgb(), (255, 0, 255));
    }

    #[test]
    fn test_tile_defaults_are_opaque() {
        assert!(Rgba::DEFAULT_FOREGROUND.is_opaque());
        assert!(Rgba::DEFAULT_BACKGROUND.is_opaque());
        assert_ne!(Rgba::DEFAULT_FOREGROUND, Rgba::DEFAULT_BACKGROUND);
    }
}
