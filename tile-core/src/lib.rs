//! Tile Core - the tile grid model
//!
//! This crate provides the data structures behind a tile-based pseudo
//! terminal display:
//! - Tiles: one character cell with colors and style flags
//! - Tile grids: fixed-size, positioned 2D arrays of tiles
//! - Scenes: an arena linking grids into layered parent/child trees
//! - Bitmaps and transform chains used when rendering glyph images
//!
//! Nothing here renders pixels by itself; glyph rasterization and caching
//! live in `tile-render`.

mod bitmap;
mod color;
mod error;
mod grid;
mod scene;
mod snapshot;
mod tile;
pub mod transform;

pub use bitmap::Bitmap;
pub use color::Rgba;
pub use error::{Error, Result};
pub use grid::TileGrid;
pub use scene::{GridId, Scene};
pub use snapshot::{color_hex, GridSnapshot, SnapshotRow, SnapshotSpan};
pub use tile::{Tile, TileFlags};
pub use transform::{FlipHorizontal, FlipVertical, Tint, Transform, TransformChain};
