//! Tile representation
//!
//! A tile is one character cell of a tile grid. Each tile contains:
//! - A character (always a valid Unicode scalar value)
//! - Foreground and background colors
//! - Style flags (hidden, underline, horizontal/vertical flip)
//! - Optional transform chain applied to its glyph image

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::transform::TransformChain;

/// Flags for tile style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileFlags {
    bits: u8,
}

impl TileFlags {
    pub const NONE: u8 = 0;
    pub const HIDDEN: u8 = 1 << 0;
    pub const UNDERLINE: u8 = 1 << 1;
    pub const FLIP_HORIZONTAL: u8 = 1 << 2;
    pub const FLIP_VERTICAL: u8 = 1 << 3;

    pub const fn empty() -> Self {
        TileFlags { bits: Self::NONE }
    }

    pub fn contains(&self, flag: u8) -> bool {
        self.bits & flag != 0
    }

    pub fn set(&mut self, flag: u8, value: bool) {
        if value {
            self.bits |= flag;
        } else {
            self.bits &= !flag;
        }
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// A single cell of a tile grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    code_point: char,
    foreground: Rgba,
    background: Rgba,
    flags: TileFlags,
    #[serde(deserialize_with = "deserialize_thickness")]
    underline_thickness: u32,
    #[serde(skip)]
    transforms: Option<Arc<TransformChain>>,
}

impl Tile {
    /// Create a blank tile (a space with default colors)
    pub fn new() -> Self {
        Self::with_char(' ')
    }

    /// Create a tile showing `c` with default colors
    pub fn with_char(c: char) -> Self {
        Self {
            code_point: c,
            foreground: Rgba::DEFAULT_FOREGROUND,
            background: Rgba::DEFAULT_BACKGROUND,
            flags: TileFlags::empty(),
            underline_thickness: 1,
            transforms: None,
        }
    }

    /// Create a tile from a raw code point, rejecting non-scalar values
    pub fn from_code_point(code_point: u32) -> Result<Self> {
        let c = char::from_u32(code_point).ok_or(Error::InvalidCodePoint(code_point))?;
        Ok(Self::with_char(c))
    }

    pub fn code_point(&self) -> char {
        self.code_point
    }

    pub fn set_char(&mut self, c: char) {
        self.code_point = c;
    }

    /// Set the character from a raw code point.
    ///
    /// Surrogates and values above U+10FFFF are rejected and leave the tile
    /// untouched.
    pub fn set_code_point(&mut self, code_point: u32) -> Result<()> {
        self.code_point = char::from_u32(code_point).ok_or(Error::InvalidCodePoint(code_point))?;
        Ok(())
    }

    pub fn foreground(&self) -> Rgba {
        self.foreground
    }

    /// Set the foreground color, returning whether it changed
    pub fn set_foreground(&mut self, color: Rgba) -> bool {
        if self.foreground == color {
            return false;
        }
        self.foreground = color;
        true
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Set the background color, returning whether it changed
    pub fn set_background(&mut self, color: Rgba) -> bool {
        if self.background == color {
            return false;
        }
        self.background = color;
        true
    }

    pub fn flags(&self) -> TileFlags {
        self.flags
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(TileFlags::HIDDEN)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.flags.set(TileFlags::HIDDEN, hidden);
    }

    pub fn is_underlined(&self) -> bool {
        self.flags.contains(TileFlags::UNDERLINE)
    }

    pub fn set_underlined(&mut self, underlined: bool) {
        self.flags.set(TileFlags::UNDERLINE, underlined);
    }

    pub fn is_flipped_horizontally(&self) -> bool {
        self.flags.contains(TileFlags::FLIP_HORIZONTAL)
    }

    pub fn set_flipped_horizontally(&mut self, flipped: bool) {
        self.flags.set(TileFlags::FLIP_HORIZONTAL, flipped);
    }

    pub fn is_flipped_vertically(&self) -> bool {
        self.flags.contains(TileFlags::FLIP_VERTICAL)
    }

    pub fn set_flipped_vertically(&mut self, flipped: bool) {
        self.flags.set(TileFlags::FLIP_VERTICAL, flipped);
    }

    /// Underline thickness in pixels, never below 1
    pub fn underline_thickness(&self) -> u32 {
        self.underline_thickness
    }

    /// Set the underline thickness; values <= 0 become 1
    pub fn set_underline_thickness(&mut self, thickness: i32) {
        self.underline_thickness = thickness.max(1) as u32;
    }

    pub fn transforms(&self) -> Option<&Arc<TransformChain>> {
        self.transforms.as_ref()
    }

    pub fn set_transforms(&mut self, chain: Option<Arc<TransformChain>>) {
        self.transforms = chain;
    }

    /// Identity of the attached chain, if any
    pub fn transform_identity(&self) -> Option<u64> {
        self.transforms.as_ref().map(|chain| chain.identity())
    }

    /// Reset tile to default state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Stored thickness goes through the same clamp as the setter
fn deserialize_thickness<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let thickness = i64::deserialize(deserializer)?;
    Ok(thickness.clamp(1, i64::from(u32::MAX)) as u32)
}

impl Default for Tile {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.code_point == other.code_point
            && self.foreground == other.foreground
            && self.background == other.background
            && self.flags == other.flags
            && self.underline_thickness == other.underline_thickness
            && self.transform_identity() == other.transform_identity()
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code_point.hash(state);
        self.foreground.hash(state);
        self.background.hash(state);
        self.flags.hash(state);
        self.underline_thickness.hash(state);
        self.transform_identity().hash(state);
    }
}
