//! Dungeon Schema
//!
//! The canonical `Dungeon` shape exchanged between generators, storage and
//! clients, plus:
//! - `validate` / `validate_str` / `validate_grid`: the single gate for
//!   externally sourced dungeon JSON
//! - `logical_defects`: entrance/exit checks that are not schema failures
//! - `ClientPayload`: the trimmed shape a web client renders
//! - `MapRow`: the persisted editor map shape

pub mod map_row;
pub mod validate;

pub use map_row::{CustomTexture, MapRow, TextureKind};
pub use validate::{validate, validate_grid, validate_str, FieldIssue, ValidationError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::{TileGrid, Vec2};
use crate::tiles::{self, TileKind, TileSemantics};

pub type JsonObject = serde_json::Map<String, serde_json::Value>;

// ============================================================
// Dungeon shape
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.x && pos.x < self.x + self.w && pos.y >= self.y && pos.y < self.y + self.h
    }

    /// Every position covered by the rectangle, row-major
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (self.y..self.y + self.h)
            .flat_map(move |y| (self.x..self.x + self.w).map(move |x| Vec2::new(x, y)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub rect: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    Trap,
    Chest,
    Altar,
    Fountain,
    SecretDoor,
    Crack,
    Rock,
    Torch,
    Sign,
}

impl FeatureType {
    pub const NAMES: [&'static str; 9] = [
        "trap",
        "chest",
        "altar",
        "fountain",
        "secret_door",
        "crack",
        "rock",
        "torch",
        "sign",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub pos: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Npc,
    Mob,
    Boss,
    Merchant,
    Mage,
    Player,
}

impl EntityKind {
    pub const NAMES: [&'static str; 6] = ["npc", "mob", "boss", "merchant", "mage", "player"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub kind: EntityKind,
    pub name: String,
    pub pos: Vec2,
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonObject>,
}

/// A complete dungeon level as stored and transmitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dungeon {
    pub id: String,
    pub seed: String,
    pub level: u32,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    pub features: Vec<Feature>,
    pub entities: Vec<Entity>,
    pub entrances: Vec<Vec2>,
    pub exits: Vec<Vec2>,
}

/// Identity and lifetime fields shared by every way of building a `Dungeon`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonHeader {
    pub id: String,
    pub seed: String,
    pub level: u32,
    pub ttl_seconds: u64,
    pub created_at: DateTime<Utc>,
}

impl Dungeon {
    /// A dungeon with no rooms, features, entities, entrances or exits yet
    pub fn from_header(header: DungeonHeader, grid: TileGrid) -> Self {
        Self {
            id: header.id,
            seed: header.seed,
            level: header.level,
            created_at: header.created_at,
            ttl_seconds: header.ttl_seconds,
            grid,
            rooms: Vec::new(),
            features: Vec::new(),
            entities: Vec::new(),
            entrances: Vec::new(),
            exits: Vec::new(),
        }
    }

    /// The JSON artifact format: 2-space indented
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================
// Logical defects
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Entrance,
    Exit,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Endpoint::Entrance => "entrance",
            Endpoint::Exit => "exit",
        })
    }
}

/// A structurally valid dungeon that still cannot be played as-is
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogicalDefect {
    #[error("dungeon has no {0}")]
    Missing(Endpoint),
    #[error("{endpoint} at ({}, {}) lies outside the {width}x{height} grid", pos.x, pos.y)]
    OutOfBounds {
        endpoint: Endpoint,
        pos: Vec2,
        width: usize,
        height: usize,
    },
    #[error("{endpoint} at ({}, {}) is on non-walkable tile '{tile}'", pos.x, pos.y)]
    NotWalkable {
        endpoint: Endpoint,
        pos: Vec2,
        tile: TileKind,
    },
}

/// Entrance/exit problems of an already validated dungeon
pub fn logical_defects(dungeon: &Dungeon) -> Vec<LogicalDefect> {
    let mut defects = Vec::new();
    let grid = &dungeon.grid;
    for (endpoint, list) in [
        (Endpoint::Entrance, &dungeon.entrances),
        (Endpoint::Exit, &dungeon.exits),
    ] {
        if list.is_empty() {
            defects.push(LogicalDefect::Missing(endpoint));
        }
        for &pos in list {
            match grid.get(pos) {
                None if !grid.in_bounds(pos) => defects.push(LogicalDefect::OutOfBounds {
                    endpoint,
                    pos,
                    width: grid.width,
                    height: grid.height,
                }),
                tile => {
                    // A short ragged row reads as solid
                    let tile = tile.copied().unwrap_or(TileKind::SOLID);
                    if !tile.is_walkable() {
                        defects.push(LogicalDefect::NotWalkable { endpoint, pos, tile });
                    }
                }
            }
        }
    }
    defects
}

// ============================================================
// Client payload
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMeta {
    pub id: String,
    pub level: u32,
    pub seed: String,
    /// Tile table the client should resolve `grid` against
    #[serde(rename = "tableVersion")]
    pub table_version: u32,
}

/// What a web client receives: no player entities, identity folded into `meta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPayload {
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    pub features: Vec<Feature>,
    pub entities: Vec<Entity>,
    pub meta: ClientMeta,
}

impl From<&Dungeon> for ClientPayload {
    fn from(d: &Dungeon) -> Self {
        Self {
            grid: d.grid.clone(),
            rooms: d.rooms.clone(),
            features: d.features.clone(),
            entities: d
                .entities
                .iter()
                .filter(|e| e.kind != EntityKind::Player)
                .cloned()
                .collect(),
            meta: ClientMeta {
                id: d.id.clone(),
                level: d.level,
                seed: d.seed.clone(),
                table_version: tiles::TABLE_VERSION,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn small_dungeon() -> Dungeon {
        let mut grid = TileGrid::filled(4, 3, TileKind::Wall);
        grid.set(Vec2::new(1, 1), TileKind::Floor);
        grid.set(Vec2::new(2, 1), TileKind::Floor);
        let header = DungeonHeader {
            id: "d1".into(),
            seed: "abc".into(),
            level: 2,
            ttl_seconds: 900,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
        };
        let mut d = Dungeon::from_header(header, grid);
        d.entrances.push(Vec2::new(1, 1));
        d.exits.push(Vec2::new(2, 1));
        d
    }

    fn entity(kind: EntityKind) -> Entity {
        Entity {
            id: format!("{kind:?}"),
            kind,
            name: "someone".into(),
            pos: Vec2::new(1, 1),
            level: 1,
            hostile: None,
            ai: None,
            data: None,
        }
    }

    #[test]
    fn test_well_placed_endpoints_have_no_defects() {
        assert!(logical_defects(&small_dungeon()).is_empty());
    }

    #[test]
    fn test_missing_and_bad_endpoints() {
        let mut d = small_dungeon();
        d.entrances.clear();
        d.exits = vec![Vec2::new(0, 0), Vec2::new(9, 9)];
        let defects = logical_defects(&d);
        assert_eq!(defects.len(), 3, "got {defects:?}");
        assert_eq!(defects[0], LogicalDefect::Missing(Endpoint::Entrance));
        assert!(matches!(
            defects[1],
            LogicalDefect::NotWalkable { endpoint: Endpoint::Exit, tile: TileKind::Wall, .. }
        ));
        assert!(matches!(defects[2], LogicalDefect::OutOfBounds { .. }));
        assert!(defects[2].to_string().contains("outside the 4x3 grid"));
    }

    #[test]
    fn test_client_payload_drops_players() {
        let mut d = small_dungeon();
        d.entities = vec![
            entity(EntityKind::Player),
            entity(EntityKind::Mob),
            entity(EntityKind::Npc),
        ];
        let payload = ClientPayload::from(&d);
        assert_eq!(payload.entities.len(), 2);
        assert!(payload.entities.iter().all(|e| e.kind != EntityKind::Player));
        assert_eq!(payload.meta.id, "d1");
        assert_eq!(payload.meta.level, 2);
        assert_eq!(payload.meta.seed, "abc");
        assert_eq!(payload.meta.table_version, tiles::TABLE_VERSION);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["meta"]["tableVersion"], tiles::TABLE_VERSION);
    }

    #[test]
    fn test_pretty_json_uses_camel_case_and_two_spaces() {
        let json = small_dungeon().to_pretty_json().unwrap();
        assert!(json.contains("\n  \"createdAt\": \"2025-01-02T03:04:05Z\""), "{json}");
        assert!(json.contains("\"ttlSeconds\": 900"));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_feature_type_wire_names() {
        let json = serde_json::to_value(FeatureType::SecretDoor).unwrap();
        assert_eq!(json, "secret_door");
        assert!(FeatureType::NAMES.contains(&"secret_door"));
    }

    #[test]
    fn test_rect_positions() {
        let r = Rect::new(2, 3, 2, 2);
        let cells: Vec<Vec2> = r.positions().collect();
        assert_eq!(cells, vec![Vec2::new(2, 3), Vec2::new(3, 3), Vec2::new(2, 4), Vec2::new(3, 4)]);
        assert!(r.contains(Vec2::new(3, 4)));
        assert!(!r.contains(Vec2::new(4, 4)));
    }
}
