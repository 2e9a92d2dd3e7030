//! Error types for scene loading

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Scene file error type
#[derive(Error, Debug)]
pub enum Error {
    /// The scene file does not exist
    #[error("Scene file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Read failure or corrupt gzip stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing or malformed file header
    #[error("Invalid header: {0}")]
    Header(String),

    /// Truncated or malformed layer body
    #[error("Failed to parse layer {layer} at cell {cell}: {reason}")]
    Parse {
        layer: usize,
        cell: usize,
        reason: String,
    },

    /// A grid cannot be represented in the file format
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, Error>;
