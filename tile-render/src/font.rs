//! Font collaborator used by the glyph cache
//!
//! The cache never rasterizes glyphs itself. It asks a [`GlyphRasterizer`]
//! for a bare glyph image in the requested color, one cell in size.

use tile_core::{Bitmap, Rgba};

/// Turns a character and color into a cell-sized bitmap
pub trait GlyphRasterizer: Send + Sync {
    /// Whether the font has a glyph for `c`
    fn can_display(&self, c: char) -> bool;

    /// Render `c` in `color` onto a transparent `cell_width` x `cell_height` bitmap
    fn rasterize(&self, c: char, color: Rgba) -> Bitmap;

    /// Cell width in pixels, fixed per font instance
    fn cell_width(&self) -> u32;

    /// Cell height in pixels, fixed per font instance
    fn cell_height(&self) -> u32;
}

#[cfg(feature = "fontdue")]
pub use self::fontdue_backend::FontdueRasterizer;

#[cfg(feature = "fontdue")]
mod fontdue_backend {
    use std::path::Path;

    use fontdue::{Font, FontSettings};
    use tile_core::{Bitmap, Rgba};

    use super::GlyphRasterizer;
    use crate::error::{Error, Result};

    /// Rasterizer backed by a fontdue font
    pub struct FontdueRasterizer {
        font: Font,
        font_size: f32,
        cell_width: u32,
        cell_height: u32,
        /// Baseline offset from top of cell
        baseline: f32,
    }

    impl FontdueRasterizer {
        /// Load a font file
        pub fn new(font_path: &Path, font_size: f32) -> Result<Self> {
            let font_data = std::fs::read(font_path)?;
            Self::from_bytes(&font_data, font_size)
        }

        /// Create a rasterizer from font data bytes
        pub fn from_bytes(font_data: &[u8], font_size: f32) -> Result<Self> {
            let font = Font::from_bytes(font_data, FontSettings::default())
                .map_err(|e| Error::Font(e.to_string()))?;

            // Use 'M' as reference for width (em-width)
            let (metrics, _) = font.rasterize('M', font_size);
            let line_metrics = font
                .horizontal_line_metrics(font_size)
                .ok_or_else(|| Error::Font("No line metrics".to_string()))?;

            let cell_width = metrics.advance_width.ceil().max(1.0) as u32;
            let cell_height = line_metrics.new_line_size.ceil().max(1.0) as u32;
            log::debug!(
                "fontdue rasterizer: size {} cell {}x{}",
                font_size,
                cell_width,
                cell_height
            );

            Ok(Self {
                font,
                font_size,
                cell_width,
                cell_height,
                baseline: line_metrics.ascent,
            })
        }
    }

    impl GlyphRasterizer for FontdueRasterizer {
        fn can_display(&self, c: char) -> bool {
            self.font.lookup_glyph_index(c) != 0
        }

        fn rasterize(&self, c: char, color: Rgba) -> Bitmap {
            let (metrics, coverage) = self.font.rasterize(c, self.font_size);
            let mut bitmap = Bitmap::blank(self.cell_width, self.cell_height);

            let left = metrics.xmin;
            let top = self.baseline.round() as i32 - metrics.height as i32 - metrics.ymin;
            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let alpha = coverage[gy * metrics.width + gx];
                    if alpha == 0 {
                        continue;
                    }
                    let x = left + gx as i32;
                    let y = top + gy as i32;
                    if x < 0 || y < 0 {
                        continue;
                    }
                    let a = (alpha as u16 * color.a as u16 / 255) as u8;
                    bitmap.set_pixel(x as u32, y as u32, color.with_alpha(a));
                }
            }
            bitmap
        }

        fn cell_width(&self) -> u32 {
            self.cell_width
        }

        fn cell_height(&self) -> u32 {
            self.cell_height
        }
    }
}
