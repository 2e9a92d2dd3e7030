//! RGBA bitmaps produced by glyph rasterization and transforms

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::color::Rgba;

/// An RGBA8 image, row-major, four bytes per pixel
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Bitmap {
    /// Wrap an existing pixel buffer.
    ///
    /// Returns `None` when the buffer length is not `width * height * 4`.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A fully transparent bitmap
    pub fn blank(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// A bitmap with every pixel set to `color`
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let rgba = color
            .to_array()
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw pixel bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    /// Pixel at (x, y), transparent when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        match self.offset(x, y) {
            Some(idx) => Rgba::rgba(
                self.rgba[idx],
                self.rgba[idx + 1],
                self.rgba[idx + 2],
                self.rgba[idx + 3],
            ),
            None => Rgba::TRANSPARENT,
        }
    }

    /// Set the pixel at (x, y); out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(idx) = self.offset(x, y) {
            self.rgba[idx..idx + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Hash of the dimensions and pixel content
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(Bitmap::new(2, 2, vec![0; 16]).is_some());
        assert!(Bitmap::new(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_pixel_access() {
        let mut bitmap = Bitmap::blank(3, 2);
        bitmap.set_pixel(2, 1, Rgba::WHITE);
        assert_eq!(bitmap.pixel(2, 1), Rgba::WHITE);
        assert_eq!(bitmap.pixel(0, 0), Rgba::TRANSPARENT);
        assert_eq!(bitmap.pixel(3, 0), Rgba::TRANSPARENT);

        // Out-of-bounds writes are dropped
        bitmap.set_pixel(9, 9, Rgba::WHITE);
        assert_eq!(bitmap.as_bytes().len(), 3 * 2 * 4);
    }

    #[test]
    fn test_filled() {
        let bitmap = Bitmap::filled(2, 2, Rgba::MAGENTA);
        assert_eq!(bitmap.pixel(1, 1), Rgba::MAGENTA);
        assert_eq!(bitmap.dimensions(), (2, 2));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = Bitmap::blank(4, 4);
        let mut b = Bitmap::blank(4, 4);
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.set_pixel(0, 0, Rgba::WHITE);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(Bitmap::blank(2, 8).fingerprint(), Bitmap::blank(8, 2).fingerprint());
    }
}
