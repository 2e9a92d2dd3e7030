//! Error types for the tile model

use thiserror::Error;

use crate::scene::GridId;

/// Tile model error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Value is not a Unicode scalar value (surrogate or above U+10FFFF)
    #[error("Invalid code point: {0:#x}")]
    InvalidCodePoint(u32),

    /// Fail-fast tile access outside the grid
    #[error("Tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// Serialized grid whose tiles do not match its dimensions
    #[error("Grid of {width}x{height} cannot hold {tiles} tiles")]
    MalformedGrid {
        width: usize,
        height: usize,
        tiles: usize,
    },

    /// A transform broke its size-preservation contract
    #[error("Transform #{index} changed image size from {expected:?} to {actual:?}")]
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Attaching the child would make a grid its own ancestor
    #[error("Adding {child:?} under {parent:?} would create a cycle")]
    CompositionCycle { parent: GridId, child: GridId },

    /// Handle does not refer to a live grid
    #[error("Unknown grid {0:?}")]
    UnknownGrid(GridId),
}

/// Result type for tile model operations
pub type Result<T> = std::result::Result<T, Error>;
