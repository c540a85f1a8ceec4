//! Legacy Adapter
//!
//! Converts the older generator outputs into canonical shapes:
//! - token grids (`[["wall","room"],...]`) into a `TileGrid`
//! - bare grids into a `Dungeon` with default entrance/exit
//! - character-legend maps and flat `{x,y,type}` records (see `formats`)
//! - the hyphenated reference id (see `refid`)
//!
//! The adapter is best effort. Unknown tokens degrade to a default and are
//! logged; nothing here rejects input. Structural problems are left for
//! `schema::validate` and `schema::logical_defects` to report.

pub mod formats;
pub mod refid;

pub use formats::{
    char_map_from_grid, grid_from_char_map, grid_to_tile_records, tile_records_to_grid, TileRecord,
};
pub use refid::{
    parse_legacy_ref, DungeonRef, DungeonRefError, LegacyRef, LegacyRefError, RefNote,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEVEL, DEFAULT_TTL_SECONDS};
use crate::grid::{TileGrid, Vec2};
use crate::schema::{Dungeon, DungeonHeader};
use crate::tiles::{MapTile, TileKind};

/// Map one legacy token onto the canonical vocabulary
pub fn token_to_tile(token: &str) -> Option<TileKind> {
    match token {
        "wall" => Some(TileKind::Wall),
        "room" | "path" => Some(TileKind::Floor),
        "door" => Some(TileKind::Door),
        "water" => Some(TileKind::Water),
        "void" => Some(TileKind::Void),
        _ => None,
    }
}

/// Convert a legacy token grid.
///
/// `width` comes from the first row. Ragged rows are kept as they are so the
/// validator can report them.
pub fn grid_from_legacy<S: AsRef<str>>(tokens: &[Vec<S>]) -> TileGrid {
    let height = tokens.len();
    let width = tokens.first().map_or(0, Vec::len);
    let mut unknown = 0usize;
    let tiles: Vec<Vec<TileKind>> = tokens
        .iter()
        .map(|row| {
            row.iter()
                .map(|tok| {
                    token_to_tile(tok.as_ref()).unwrap_or_else(|| {
                        unknown += 1;
                        TileKind::Void
                    })
                })
                .collect()
        })
        .collect();
    if unknown > 0 {
        tracing::warn!(unknown, "legacy grid contained unknown tokens, mapped to void");
    }
    TileGrid {
        width,
        height,
        tiles,
    }
}

/// Inputs for `dungeon_from_parts`
#[derive(Debug, Clone, PartialEq)]
pub struct DungeonParts {
    pub id: String,
    pub seed: String,
    pub level: u32,
    pub ttl_seconds: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub grid: TileGrid,
    pub entrance: Option<Vec2>,
    pub exit: Option<Vec2>,
}

impl DungeonParts {
    /// Parts for a legend char map. The first `^` becomes the entrance and the
    /// last `V` the exit; both stay unset when the map has none.
    pub fn from_char_map(id: impl Into<String>, seed: impl Into<String>, text: &str) -> Self {
        let map = grid_from_char_map(text);
        Self {
            id: id.into(),
            seed: seed.into(),
            level: DEFAULT_LEVEL,
            ttl_seconds: None,
            created_at: None,
            entrance: map.find_first(|t| *t == MapTile::Entrance),
            exit: map.find_last(|t| *t == MapTile::Exit),
            grid: map.map(MapTile::terrain),
        }
    }
}

/// Wrap a grid in a minimal dungeon.
///
/// A missing entrance defaults to the top-left corner and a missing exit to
/// the bottom-right. Neither is checked for walkability here.
pub fn dungeon_from_parts(parts: DungeonParts) -> Dungeon {
    let header = DungeonHeader {
        id: parts.id,
        seed: parts.seed,
        level: parts.level,
        ttl_seconds: parts.ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS),
        created_at: parts.created_at.unwrap_or_else(Utc::now),
    };
    let far_corner = Vec2::new(parts.grid.width as i32 - 1, parts.grid.height as i32 - 1);
    let mut dungeon = Dungeon::from_header(header, parts.grid);
    dungeon.entrances.push(parts.entrance.unwrap_or(Vec2::new(0, 0)));
    dungeon.exits.push(parts.exit.unwrap_or(far_corner));
    dungeon
}

/// Output of the older generator: a token grid and its seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDungeon {
    pub tokens: Vec<Vec<String>>,
    pub seed: String,
}

impl LegacyDungeon {
    /// Level-1 dungeon with the given id
    pub fn into_dungeon(self, id: impl Into<String>) -> Dungeon {
        dungeon_from_parts(DungeonParts {
            id: id.into(),
            seed: self.seed,
            level: DEFAULT_LEVEL,
            ttl_seconds: None,
            created_at: None,
            grid: grid_from_legacy(&self.tokens),
            entrance: None,
            exit: None,
        })
    }
}
