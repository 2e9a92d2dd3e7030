//! Frame planning
//!
//! Walks a scene tree in paint order and resolves every tile through a
//! glyph cache, producing the list of draw operations an external compositor
//! executes: fill the cell background, then blit the glyph image on top.
//!
//! Tile flips are not baked into the cached glyph; the compositor mirrors
//! the image while blitting, as directed by the draw's flip flags.

use std::sync::Arc;

use tile_core::{Bitmap, GridId, Rgba, Scene};
use tile_render::{GlyphCache, Result};

/// One cell to paint, in pixel coordinates
#[derive(Debug, Clone)]
pub struct CellDraw {
    /// Grid the cell belongs to
    pub grid: GridId,
    /// Top-left corner of the cell in pixels
    pub x: u32,
    pub y: u32,
    pub background: Rgba,
    /// Glyph image, absent for blanks and hidden tiles
    pub glyph: Option<Arc<Bitmap>>,
    /// Underline thickness in pixels when the tile is underlined
    pub underline: Option<u32>,
    /// Mirror the glyph left to right when blitting
    pub flip_horizontal: bool,
    /// Mirror the glyph top to bottom when blitting
    pub flip_vertical: bool,
}

/// Resolve every tile of the tree rooted at `root`, parents before children.
///
/// Fully transparent backgrounds with no glyph produce no draw operation.
pub fn plan_frame(scene: &Scene, root: GridId, cache: &GlyphCache) -> Result<Vec<CellDraw>> {
    let (cell_width, cell_height) = cache.cell_size();
    let mut draws = Vec::new();

    for (id, (origin_x, origin_y)) in scene.draw_order(root) {
        let Some(grid) = scene.get(id) else {
            continue;
        };
        for (col, row, tile) in grid.iter() {
            let glyph = cache.resolve_tile(tile)?;
            let background = tile.background();
            if glyph.is_none() && background.is_transparent() {
                continue;
            }

            draws.push(CellDraw {
                grid: id,
                x: to_pixels(origin_x.saturating_add(col), cell_width),
                y: to_pixels(origin_y.saturating_add(row), cell_height),
                background,
                glyph,
                underline: tile.is_underlined().then(|| tile.underline_thickness()),
                flip_horizontal: tile.is_flipped_horizontally(),
                flip_vertical: tile.is_flipped_vertically(),
            });
        }
    }

    log::trace!("planned {} cell draws", draws.len());
    Ok(draws)
}

/// Cell index to pixel offset, saturating at `u32::MAX`
fn to_pixels(cells: usize, cell_size: u32) -> u32 {
    u32::try_from(cells)
        .unwrap_or(u32::MAX)
        .saturating_mul(cell_size)
}
