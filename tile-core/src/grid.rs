//! Tile grid - a positioned 2D array of tiles
//!
//! Dimensions are fixed when the grid is created. Requested sizes below 1 are
//! clamped to 1 and negative positions to 0. Tiles are stored densely in
//! row-major order.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::tile::Tile;

/// A fixed-size grid of tiles with an origin position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct TileGrid {
    /// Tiles in row-major order (row 0 is top)
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
    x: usize,
    y: usize,
}

impl TileGrid {
    /// Create a grid of blank tiles at position (0, 0)
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_fill(width, height, &Tile::new())
    }

    /// Create a grid where every tile is a copy of `tile`
    pub fn with_fill(width: i32, height: i32, tile: &Tile) -> Self {
        let width = clamp_dimension(width);
        let height = clamp_dimension(height);
        Self {
            tiles: vec![tile.clone(); width * height],
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    /// Builder-style position setter
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of tiles (width * height)
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false; grids hold at least one tile
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Origin of the grid relative to its parent
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Move the grid; negative coordinates are clamped to 0
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x.max(0) as usize;
        self.y = y.max(0) as usize;
    }

    /// Get a tile, failing on out-of-range coordinates
    pub fn get(&self, x: i32, y: i32) -> Result<&Tile> {
        match self.index(x, y) {
            Some(idx) => Ok(&self.tiles[idx]),
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Get a mutable tile, failing on out-of-range coordinates
    pub fn get_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile> {
        match self.index(x, y) {
            Some(idx) => Ok(&mut self.tiles[idx]),
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Get a tile, returning None if out of bounds
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|idx| &self.tiles[idx])
    }

    /// Replace the tile at (x, y)
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> Result<()> {
        *self.get_mut(x, y)? = tile;
        Ok(())
    }

    /// Row `y`, or an empty slice when `y` is out of range
    pub fn row(&self, y: i32) -> &[Tile] {
        if y < 0 || y as usize >= self.height {
            return &[];
        }
        let start = y as usize * self.width;
        &self.tiles[start..start + self.width]
    }

    /// Mutable row `y`, or an empty slice when `y` is out of range
    pub fn row_mut(&mut self, y: i32) -> &mut [Tile] {
        if y < 0 || y as usize >= self.height {
            return Default::default();
        }
        let start = y as usize * self.width;
        &mut self.tiles[start..start + self.width]
    }

    /// Column `x` from top to bottom, or empty when `x` is out of range
    pub fn column(&self, x: i32) -> Vec<&Tile> {
        if x < 0 || x as usize >= self.width {
            return Vec::new();
        }
        self.tiles
            .iter()
            .skip(x as usize)
            .step_by(self.width)
            .collect()
    }

    /// `length` tiles of row `y` starting at `x_start`.
    ///
    /// Empty when the row or start is out of range, `length` is not positive,
    /// or the range would run past the end of the row.
    pub fn row_subset(&self, y: i32, x_start: i32, length: i32) -> &[Tile] {
        let row = self.row(y);
        if row.is_empty() || x_start < 0 || length <= 0 {
            return &[];
        }
        let start = x_start as usize;
        let end = start + length as usize;
        if end > row.len() {
            return &[];
        }
        &row[start..end]
    }

    /// Iterator over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks_exact(self.width)
    }

    /// Iterator over `(x, y, tile)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Tile)> {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (idx % width, idx / width, tile))
    }

    /// Mutable iterator over all tiles in row-major order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Copy `tile` into every cell
    pub fn fill(&mut self, tile: &Tile) {
        for slot in &mut self.tiles {
            slot.clone_from(tile);
        }
    }

    /// Reset every tile to default state
    pub fn clear(&mut self) {
        for tile in &mut self.tiles {
            tile.reset();
        }
    }

    /// Write `text` into row `y` starting at column `x`.
    ///
    /// Characters that fall outside the row are dropped. Returns the number of
    /// tiles written.
    pub fn write_str(&mut self, x: i32, y: i32, text: &str, fg: Rgba, bg: Rgba) -> usize {
        let row = self.row_mut(y);
        if row.is_empty() || x < 0 {
            return 0;
        }
        let mut written = 0;
        for (tile, c) in row.iter_mut().skip(x as usize).zip(text.chars()) {
            tile.set_char(c);
            tile.set_foreground(fg);
            tile.set_background(bg);
            written += 1;
        }
        written
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> Error {
        Error::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

fn clamp_dimension(requested: i32) -> usize {
    requested.max(1) as usize
}

/// Unchecked serialized form of a [`TileGrid`]
#[derive(Deserialize)]
struct RawGrid {
    tiles: Vec<Tile>,
    width: usize,
    height: usize,
    x: usize,
    y: usize,
}

impl TryFrom<RawGrid> for TileGrid {
    type Error = Error;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let fits = raw
            .width
            .checked_mul(raw.height)
            .is_some_and(|len| len == raw.tiles.len());
        if raw.width == 0 || raw.height == 0 || !fits {
            return Err(Error::MalformedGrid {
                width: raw.width,
                height: raw.height,
                tiles: raw.tiles.len(),
            });
        }
        Ok(Self {
            tiles: raw.tiles,
            width: raw.width,
            height: raw.height,
            x: raw.x,
            y: raw.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lettered(width: i32, height: i32) -> TileGrid {
        let mut grid = TileGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let c = (b'a' + (y * width + x) as u8) as char;
                grid.get_mut(x, y).unwrap().set_char(c);
            }
        }
        grid
    }

    fn text(tiles: &[Tile]) -> String {
        tiles.iter().map(Tile::code_point).collect()
    }

    #[test]
    fn test_grid_new() {
        let grid = TileGrid::new(80, 24);
        assert_eq!(grid.width(), 80);
        assert_eq!(grid.height(), 24);
        assert_eq!(grid.len(), 80 * 24);
        assert_eq!(grid.position(), (0, 0));
    }

    #[test]
    fn test_dimensions_clamped() {
        let grid = TileGrid::new(0, -5);
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.height(), 1);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_position_clamped() {
        let mut grid = TileGrid::new(2, 2).with_position(-3, 4);
        assert_eq!(grid.position(), (0, 4));
        grid.set_position(7, -1);
        assert_eq!(grid.position(), (7, 0));
    }

    #[test]
    fn test_get_fails_fast() {
        let grid = TileGrid::new(3, 2);
        assert!(grid.get(2, 1).is_ok());
        assert_eq!(
            grid.get(3, 0).unwrap_err(),
            Error::OutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            }
        );
        assert!(grid.get(-1, 0).is_err());
        assert!(grid.tile(0, 2).is_none());
    }

    #[test]
    fn test_rows_and_columns() {
        let grid = lettered(3, 2);
        assert_eq!(text(grid.row(0)), "abc");
        assert_eq!(text(grid.row(1)), "def");
        let column: String = grid.column(1).into_iter().map(Tile::code_point).collect();
        assert_eq!(column, "be");
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn test_row_subset() {
        let grid = lettered(4, 2);
        assert_eq!(text(grid.row_subset(1, 1, 2)), "fg");
        assert_eq!(text(grid.row_subset(0, 0, 4)), "abcd");
        assert!(grid.row_subset(0, 3, 2).is_empty());
        assert!(grid.row_subset(0, 1, 0).is_empty());
        assert!(grid.row_subset(0, -1, 2).is_empty());
        assert!(grid.row_subset(2, 0, 1).is_empty());
    }

    #[test]
    fn test_write_str_clips() {
        let mut grid = TileGrid::new(5, 1);
        let written = grid.write_str(3, 0, "hello", Rgba::WHITE, Rgba::TRANSPARENT);
        assert_eq!(written, 2);
        assert_eq!(text(grid.row(0)), "   he");
        assert_eq!(grid.get(4, 0).unwrap().foreground(), Rgba::WHITE);
        assert_eq!(grid.write_str(0, 1, "x", Rgba::WHITE, Rgba::BLACK), 0);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut grid = TileGrid::new(3, 3);
        grid.fill(&Tile::with_char('#'));
        assert!(grid.iter().all(|(_, _, tile)| tile.code_point() == '#'));
        grid.clear();
        assert!(grid.iter().all(|(_, _, tile)| *tile == Tile::new()));
    }

    #[test]
    fn test_iter_coordinates() {
        let grid = lettered(2, 2);
        let coords: Vec<(usize, usize, char)> = grid
            .iter()
            .map(|(x, y, tile)| (x, y, tile.code_point()))
            .collect();
        assert_eq!(
            coords,
            vec![(0, 0, 'a'), (1, 0, 'b'), (0, 1, 'c'), (1, 1, 'd')]
        );
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let grid = lettered(3, 2).with_position(4, 1);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<TileGrid>(&json).unwrap(), grid);

        let empty = r#"{"tiles":[],"width":0,"height":0,"x":0,"y":0}"#;
        assert!(serde_json::from_str::<TileGrid>(empty).is_err());

        // Two tiles claimed, one present
        let tile = serde_json::to_string(&Tile::new()).unwrap();
        let short = format!(r#"{{"tiles":[{}],"width":2,"height":1,"x":0,"y":0}}"#, tile);
        let err = serde_json::from_str::<TileGrid>(&short).unwrap_err();
        assert!(err.to_string().contains("2x1"));
    }

    proptest! {
        #[test]
        fn prop_shape_invariants(width in 1i32..64, height in 1i32..64) {
            let grid = TileGrid::new(width, height);
            prop_assert_eq!(grid.len(), (width * height) as usize);
            for y in 0..height {
                prop_assert_eq!(grid.row(y).len(), width as usize);
            }
            for x in 0..width {
                prop_assert_eq!(grid.column(x).len(), height as usize);
            }
        }

        #[test]
        fn prop_non_positive_dimensions_clamp(width in -100i32..=0, height in -100i32..=0) {
            let grid = TileGrid::new(width, height);
            prop_assert_eq!((grid.width(), grid.height()), (1, 1));
        }

        #[test]
        fn prop_negative_positions_clamp(x in -1000i32..0, y in -1000i32..0) {
            let mut grid = TileGrid::new(1, 1);
            grid.set_position(x, y);
            prop_assert_eq!(grid.position(), (0, 0));
        }

        #[test]
        fn prop_tolerant_accessors(
            width in 1i32..16,
            height in 1i32..16,
            index in prop_oneof![-50i32..0, 16i32..50],
            length in -10i32..=0,
        ) {
            let grid = TileGrid::new(width, height);
            prop_assert!(grid.row(index).is_empty());
            prop_assert!(grid.column(index).is_empty());
            prop_assert!(grid.row_subset(index, 0, 1).is_empty());
            prop_assert!(grid.row_subset(0, index, 1).is_empty());
            prop_assert!(grid.row_subset(0, 0, length).is_empty());
        }
    }
}
