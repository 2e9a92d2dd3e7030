//! Scene file loading
//!
//! Loading runs in three steps, each usable on its own:
//! 1. [`load`] reads the file, failing with `NotFound` for a missing path
//! 2. [`decompress`] inflates the whole gzip stream into memory
//! 3. [`parse`] turns the body into one [`TileGrid`] per layer
//!
//! Any failure aborts the whole load; no partial scene is returned.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tile_core::{GridId, Rgba, Scene, TileGrid};

use crate::error::{Error, Result};
use crate::format::{decode_background, ByteReader, CELL_LEN};

/// Upper bound on layers reserved up front; the count comes from the file
const MAX_RESERVED_LAYERS: usize = 64;

/// Load every layer of a scene file, in file order
pub fn load(path: impl AsRef<Path>) -> Result<Vec<TileGrid>> {
    let path = path.as_ref();
    let compressed = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    log::debug!("loading scene {} ({} bytes)", path.display(), compressed.len());

    let body = decompress(&compressed)?;
    parse(&body)
}

/// Load a scene file into a fresh [`Scene`], one root grid per layer
pub fn load_scene(path: impl AsRef<Path>) -> Result<(Scene, Vec<GridId>)> {
    let layers = load(path)?;
    let mut scene = Scene::new();
    let ids = layers.into_iter().map(|grid| scene.insert(grid)).collect();
    Ok((scene, ids))
}

/// Inflate a complete gzip stream
pub fn decompress(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut body = Vec::new();
    decoder.read_to_end(&mut body)?;
    Ok(body)
}

/// Parse a decompressed scene body
pub fn parse(body: &[u8]) -> Result<Vec<TileGrid>> {
    let mut reader = ByteReader::new(body);

    // The version is informational only
    reader
        .read_i32()
        .ok_or_else(|| Error::Header("missing format version".to_string()))?;
    let layer_count = reader
        .read_i32()
        .ok_or_else(|| Error::Header("missing layer count".to_string()))?;
    let layer_count = usize::try_from(layer_count)
        .map_err(|_| Error::Header(format!("negative layer count {}", layer_count)))?;

    let mut layers = Vec::with_capacity(layer_count.min(MAX_RESERVED_LAYERS));
    for layer in 0..layer_count {
        layers.push(parse_layer(&mut reader, layer)?);
    }

    if reader.remaining() > 0 {
        log::debug!("ignoring {} trailing bytes", reader.remaining());
    }
    Ok(layers)
}

fn parse_layer(reader: &mut ByteReader<'_>, layer: usize) -> Result<TileGrid> {
    let parse_error = |cell: usize, reason: String| Error::Parse {
        layer,
        cell,
        reason,
    };

    let width = reader
        .read_i32()
        .ok_or_else(|| parse_error(0, "missing layer width".to_string()))?;
    let height = reader
        .read_i32()
        .ok_or_else(|| parse_error(0, "missing layer height".to_string()))?;
    if width <= 0 || height <= 0 {
        return Err(parse_error(0, format!("invalid layer size {}x{}", width, height)));
    }

    // Check the whole layer is present before allocating it
    let available = reader.remaining() / CELL_LEN;
    let cells = (width as usize).checked_mul(height as usize);
    match cells {
        Some(cells) if cells <= available => {}
        _ => {
            return Err(parse_error(
                available,
                format!("body ends after {} of {}x{} cells", available, width, height),
            ))
        }
    }

    let mut grid = TileGrid::new(width, height);
    for (cell, tile) in grid.iter_mut().enumerate() {
        let truncated = || parse_error(cell, "truncated cell".to_string());
        let raw = reader.read_i32().ok_or_else(truncated)?;
        let fg = reader.read_rgb().ok_or_else(truncated)?;
        let bg = reader.read_rgb().ok_or_else(truncated)?;

        let c = u32::try_from(raw)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| parse_error(cell, format!("invalid code point {:#x}", raw)))?;
        tile.set_char(c);
        tile.set_foreground(Rgba::rgb(fg[0], fg[1], fg[2]));
        tile.set_background(decode_background(bg));
    }

    log::debug!("layer {}: {}x{}", layer, width, height);
    Ok(grid)
}
