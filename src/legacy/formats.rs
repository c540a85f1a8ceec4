//! Boundary formats that must be converted before validation.
//!
//! Character-legend maps:
//!
//! | char | tile     |
//! |------|----------|
//! | ` `  | wall     |
//! | `#`  | wall     |
//! | `,`  | floor    |
//! | `^`  | entrance |
//! | `V`  | exit     |
//!
//! Anything else reads as wall. Flat tile records are `{x, y, type}` objects
//! placed onto an all-wall grid.

use serde::{Deserialize, Serialize};

use crate::grid::{MapGrid, Vec2};
use crate::tiles::{MapTile, TileSemantics};

// ============================================================
// Character legend
// ============================================================

pub fn legend_char_to_tile(c: char) -> MapTile {
    match c {
        ',' => MapTile::Floor,
        '^' => MapTile::Entrance,
        'V' => MapTile::Exit,
        _ => MapTile::Wall,
    }
}

/// Legend character for a tile. Lossy: walkable tiles without their own
/// character become floor, everything else wall.
pub fn tile_to_legend_char(tile: MapTile) -> char {
    match tile {
        MapTile::Entrance => '^',
        MapTile::Exit => 'V',
        t if t.is_walkable() => ',',
        _ => '#',
    }
}

/// Parse a newline-delimited legend map. Short lines are padded with wall up
/// to the longest line. Blank leading/trailing lines are dropped.
pub fn grid_from_char_map(text: &str) -> MapGrid {
    let body = text.trim_matches(|c| c == '\n' || c == '\r');
    if body.trim().is_empty() {
        return MapGrid::filled(0, 0, MapTile::Wall);
    }
    let lines: Vec<&str> = body.lines().collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let tiles = lines
        .iter()
        .map(|line| {
            let mut row: Vec<MapTile> = line.chars().map(legend_char_to_tile).collect();
            row.resize(width, MapTile::Wall);
            row
        })
        .collect();
    MapGrid {
        width,
        height: lines.len(),
        tiles,
    }
}

pub fn char_map_from_grid(grid: &MapGrid) -> String {
    grid.tiles
        .iter()
        .map(|row| row.iter().copied().map(tile_to_legend_char).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================
// Flat tile records
// ============================================================

/// One `{x, y, type}` record as produced by the room-and-corridor generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub x: i64,
    pub y: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walkable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TileRecord {
    pub fn new(pos: Vec2, tile: MapTile) -> Self {
        Self {
            x: i64::from(pos.x),
            y: i64::from(pos.y),
            kind: tile.id().to_string(),
            walkable: Some(tile.is_walkable()),
            description: None,
        }
    }
}

/// Record type to gameplay tile. Rooms and corridors flatten to floor.
pub fn record_type_to_tile(kind: &str) -> Option<MapTile> {
    match kind {
        "room" | "corridor" => Some(MapTile::Floor),
        "wall" | "entrance" | "exit" | "treasure" | "trap" | "secret" | "door" | "water"
        | "tree" => MapTile::from_id(kind),
        _ => None,
    }
}

/// Place records onto an all-wall grid. Records outside the grid are skipped,
/// unknown types become wall.
pub fn tile_records_to_grid(records: &[TileRecord], width: usize, height: usize) -> MapGrid {
    let mut grid = MapGrid::filled(width, height, MapTile::Wall);
    let (mut skipped, mut unknown) = (0usize, 0usize);
    for rec in records {
        let in_range = usize::try_from(rec.x).is_ok_and(|x| x < width)
            && usize::try_from(rec.y).is_ok_and(|y| y < height);
        if !in_range {
            skipped += 1;
            continue;
        }
        let tile = record_type_to_tile(&rec.kind).unwrap_or_else(|| {
            unknown += 1;
            MapTile::Wall
        });
        grid.tiles[rec.y as usize][rec.x as usize] = tile;
    }
    if skipped > 0 || unknown > 0 {
        tracing::warn!(skipped, unknown, "tile records needed fallback handling");
    }
    grid
}

/// Row-major records for every cell, with table walkability
pub fn grid_to_tile_records(grid: &MapGrid) -> Vec<TileRecord> {
    grid.cells().map(|(pos, &tile)| TileRecord::new(pos, tile)).collect()
}
