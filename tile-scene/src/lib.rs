//! Tile Scene - layered scene files
//!
//! Reads and writes the gzip-compressed, little-endian layered format used by
//! REXPaint-style editors. Each layer becomes an independent [`TileGrid`];
//! no parent/child linkage is inferred from layer order.
//!
//! [`TileGrid`]: tile_core::TileGrid

mod error;
mod format;
mod loader;
mod writer;

pub use error::{Error, Result};
pub use format::{TRANSPARENT_KEY, VERSION};
pub use loader::{decompress, load, load_scene, parse};
pub use writer::{compress, encode, save};
