//! Tile Render - glyph images for tile grids
//!
//! This crate turns tiles into bitmaps:
//! - GlyphRasterizer: the font collaborator (fontdue backend behind the
//!   `fontdue` feature)
//! - GlyphCache: capacity and idle-time bounded cache of rendered glyphs
//! - HintsSignal: bulk invalidation when the rendering environment changes
//! - CacheConfig: cache sizing, optionally read from TOML
//!
//! Blitting the images onto a surface is left to the caller.

mod cache;
mod config;
mod error;
mod font;
mod hints;

pub use cache::{CacheStats, GlyphCache, GlyphKey};
pub use config::{CacheConfig, ConfigError};
pub use error::{Error, Result};
#[cfg(feature = "fontdue")]
pub use font::FontdueRasterizer;
pub use font::GlyphRasterizer;
pub use hints::{HintsSignal, HintsSubscription};
