//! Tilescreen
//!
//! Layered tile grids for pseudo-terminal displays:
//!
//! - `core`: tiles, colors, bitmaps, transform chains, grids and scenes
//! - `render`: the glyph image cache and its font collaborator
//! - `scene`: REXPaint-style layered scene files
//! - [`plan_frame`]: resolves a scene tree into per-cell draw operations

pub use tile_core as core;
pub use tile_render as render;
pub use tile_scene as scene;

mod frame;

pub use frame::{plan_frame, CellDraw};
