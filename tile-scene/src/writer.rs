//! Scene file writing
//!
//! Produces the same layout the loader reads. Tile flags and transform
//! chains have no place in the format and are dropped; transparent
//! backgrounds are written as the magenta key.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tile_core::TileGrid;

use crate::error::{Error, Result};
use crate::format::{encode_background, CELL_LEN, HEADER_LEN, LAYER_HEADER_LEN, VERSION};

/// Serialize layers into an uncompressed body
pub fn encode(layers: &[TileGrid]) -> Result<Vec<u8>> {
    let layer_count = to_i32(layers.len(), "layer count")?;
    let cells: usize = layers.iter().map(TileGrid::len).sum();
    let mut body =
        Vec::with_capacity(HEADER_LEN + layers.len() * LAYER_HEADER_LEN + cells * CELL_LEN);

    body.extend_from_slice(&VERSION.to_le_bytes());
    body.extend_from_slice(&layer_count.to_le_bytes());
    for grid in layers {
        body.extend_from_slice(&to_i32(grid.width(), "layer width")?.to_le_bytes());
        body.extend_from_slice(&to_i32(grid.height(), "layer height")?.to_le_bytes());
        for (_, _, tile) in grid.iter() {
            // Scalar values top out at 0x10FFFF
            body.extend_from_slice(&(u32::from(tile.code_point()) as i32).to_le_bytes());
            let fg = tile.foreground();
            body.extend_from_slice(&[fg.r, fg.g, fg.b]);
            body.extend_from_slice(&encode_background(tile.background()));
        }
    }
    Ok(body)
}

/// Gzip a body
pub fn compress(body: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body)?;
    Ok(encoder.finish()?)
}

/// Write layers to a gzip-compressed scene file
pub fn save(path: impl AsRef<Path>, layers: &[TileGrid]) -> Result<()> {
    let path = path.as_ref();
    let compressed = compress(&encode(layers)?)?;
    fs::write(path, &compressed)?;
    log::debug!(
        "saved {} layers to {} ({} bytes)",
        layers.len(),
        path.display(),
        compressed.len()
    );
    Ok(())
}

fn to_i32(value: usize, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| Error::InvalidArgument(format!("{} {} does not fit the format", what, value)))
}
