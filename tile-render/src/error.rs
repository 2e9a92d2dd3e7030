//! Error types for glyph rendering

use std::io;
use thiserror::Error;

use crate::config::ConfigError;

/// Rendering error type
#[derive(Error, Debug)]
pub enum Error {
    /// Tile model error (invalid code point, transform dimension mismatch)
    #[error(transparent)]
    Core(#[from] tile_core::Error),

    /// Rejected cache configuration
    #[error("Invalid argument: {0}")]
    Config(#[from] ConfigError),

    /// Config file could not be parsed
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Font data could not be loaded
    #[error("Failed to load font: {0}")]
    Font(String),
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;
