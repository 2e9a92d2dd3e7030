//! Grid snapshot for testing and debugging
//!
//! Provides a serializable representation of a tile grid: one text line per
//! row plus runs of tiles that share the same colors and flags.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::grid::TileGrid;
use crate::tile::Tile;

/// A complete snapshot of a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub position: (usize, usize),
    pub rows: Vec<SnapshotRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Characters of the row
    pub text: String,
    /// Style runs covering the whole row
    pub spans: Vec<SnapshotSpan>,
}

/// A run of tiles `[start, end)` with identical styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSpan {
    pub start: usize,
    pub end: usize,
    pub fg: String,
    pub bg: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
}

impl GridSnapshot {
    /// Capture the current contents of `grid`
    pub fn from_grid(grid: &TileGrid) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            position: grid.position(),
            rows: grid
                .rows()
                .map(|row| SnapshotRow {
                    text: row.iter().map(Tile::code_point).collect(),
                    spans: extract_spans(row),
                })
                .collect(),
        }
    }

    /// Rows joined with newlines
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Format a color as `#rrggbbaa`
pub fn color_hex(color: Rgba) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        color.r, color.g, color.b, color.a
    )
}

fn span_for(tile: &Tile, start: usize) -> SnapshotSpan {
    SnapshotSpan {
        start,
        end: start + 1,
        fg: color_hex(tile.foreground()),
        bg: color_hex(tile.background()),
        hidden: tile.is_hidden(),
        underline: tile.is_underlined(),
    }
}

fn extract_spans(row: &[Tile]) -> Vec<SnapshotSpan> {
    let mut spans: Vec<SnapshotSpan> = Vec::new();

    for (i, tile) in row.iter().enumerate() {
        let next = span_for(tile, i);
        match spans.last_mut() {
            Some(span)
                if span.fg == next.fg
                    && span.bg == next.bg
                    && span.hidden == next.hidden
                    && span.underline == next.underline =>
            {
                span.end = i + 1;
            }
            _ => spans.push(next),
        }
    }

    spans
}
