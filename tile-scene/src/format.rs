//! Layout of a scene file body
//!
//! Everything is little-endian. After gzip decompression the body is:
//!
//! ```text
//! version: i32, layer_count: i32
//! per layer: width: i32, height: i32, then width * height cells
//! per cell:  code_point: i32, foreground: [u8; 3], background: [u8; 3]
//! ```
//!
//! Cells are stored row by row. A background of pure magenta marks a
//! transparent cell.

use tile_core::Rgba;

/// Version written into new files; readers ignore it
pub const VERSION: i32 = -1;

pub(crate) const HEADER_LEN: usize = 8;
pub(crate) const LAYER_HEADER_LEN: usize = 8;
pub(crate) const CELL_LEN: usize = 10;

/// Background value standing in for "no background"
pub const TRANSPARENT_KEY: [u8; 3] = [255, 0, 255];

pub(crate) fn decode_background(rgb: [u8; 3]) -> Rgba {
    if rgb == TRANSPARENT_KEY {
        Rgba::rgba(rgb[0], rgb[1], rgb[2], 0)
    } else {
        Rgba::rgb(rgb[0], rgb[1], rgb[2])
    }
}

pub(crate) fn encode_background(color: Rgba) -> [u8; 3] {
    if color.is_transparent() {
        TRANSPARENT_KEY
    } else {
        [color.r, color.g, color.b]
    }
}

/// Sequential little-endian reader over a decompressed body
#[derive(Debug)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes: [u8; N] = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    pub(crate) fn read_i32(&mut self) -> Option<i32> {
        self.take::<4>().map(i32::from_le_bytes)
    }

    pub(crate) fn read_rgb(&mut self) -> Option<[u8; 3]> {
        self.take::<3>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_little_endian() {
        let data = [0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 1, 2, 3];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_i32(), Some(1));
        assert_eq!(reader.read_i32(), Some(-1));
        assert_eq!(reader.read_rgb(), Some([1, 2, 3]));
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.read_rgb(), None);
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let data = [1, 2, 3];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_i32(), None);
        assert_eq!(reader.remaining(), 3);
    }

    #[test]
    fn test_transparency_key() {
        assert_eq!(decode_background([255, 0, 255]).a, 0);
        assert_eq!(decode_background([255, 0, 254]), Rgba::rgb(255, 0, 254));
        assert_eq!(encode_background(Rgba::TRANSPARENT), TRANSPARENT_KEY);
        assert_eq!(encode_background(Rgba::rgb(1, 2, 3)), [1, 2, 3]);
    }
}
