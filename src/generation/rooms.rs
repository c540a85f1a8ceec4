//! Fixed room-and-corridor layout.
//!
//! Five hand-placed rooms joined by three corridors, an entrance near the top
//! left and an exit near the bottom right. The seed only decides where
//! treasure and traps land and the layout's theme and difficulty.
//!
//! The layout is authored for 20x15; other sizes clip it.

use serde::{Deserialize, Serialize};

use crate::constants::{MOCK_BASE_FEATURES, MOCK_MAX_DIFFICULTY};
use crate::grid::{MapGrid, Vec2};
use crate::legacy::TileRecord;
use crate::rng::{LegacyLcg, RandomStream};
use crate::schema::{Dungeon, DungeonHeader, Feature, FeatureType, Rect, Room};
use crate::tiles::MapTile;

const ROOMS: [Rect; 5] = [
    Rect::new(2, 2, 4, 3),
    Rect::new(14, 8, 5, 4),
    Rect::new(7, 11, 6, 3),
    Rect::new(3, 8, 3, 2),
    Rect::new(12, 3, 4, 3),
];

const ROOM_TAGS: [&str; 3] = ["chamber", "treasure_room", "corridor"];

/// Inclusive straight segments
const CORRIDORS: [(Vec2, Vec2); 3] = [
    (Vec2::new(6, 9), Vec2::new(14, 9)),
    (Vec2::new(9, 5), Vec2::new(9, 11)),
    (Vec2::new(3, 4), Vec2::new(6, 4)),
];

const ENTRANCE_DESCRIPTION: &str = "The entrance to this dungeon level";
const EXIT_DESCRIPTION: &str = "The exit to the next level";
const TREASURE_DESCRIPTION: &str = "A glinting treasure chest";
const TRAP_DESCRIPTION: &str = "Something seems off about this floor...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dungeon,
    Cave,
    Ruins,
    Crypt,
}

impl Theme {
    const ALL: [Theme; 4] = [Theme::Dungeon, Theme::Cave, Theme::Ruins, Theme::Crypt];

    pub fn from_seed(seed: u64) -> Self {
        Self::ALL[(seed % 4) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMetadata {
    pub difficulty: u64,
    pub theme: Theme,
}

/// A treasure or trap placed over a room/corridor tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFeature {
    pub pos: Vec2,
    pub tile: MapTile,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub grid: MapGrid,
    pub seed: u64,
    pub rooms: Vec<Rect>,
    pub entrance: Vec2,
    pub exit: Vec2,
    pub features: Vec<PlacedFeature>,
    pub metadata: LayoutMetadata,
}

fn carve_segment(grid: &mut MapGrid, from: Vec2, to: Vec2) {
    for y in from.y.min(to.y)..=from.y.max(to.y) {
        for x in from.x.min(to.x)..=from.x.max(to.x) {
            grid.set(Vec2::new(x, y), MapTile::Corridor);
        }
    }
}

/// Room-and-corridor layout. Feature placement draws from the legacy LCG
/// stream seeded with `seed`.
pub fn generate_rooms_and_corridors(width: usize, height: usize, seed: u64) -> RoomLayout {
    let mut grid = MapGrid::filled(width, height, MapTile::Wall);

    for room in &ROOMS {
        for pos in room.positions() {
            grid.set(pos, MapTile::Room);
        }
    }
    for (from, to) in CORRIDORS {
        carve_segment(&mut grid, from, to);
    }

    let entrance = Vec2::new(1, 1);
    let exit = Vec2::new(width as i32 - 2, height as i32 - 2);
    grid.set(entrance, MapTile::Entrance);
    grid.set(exit, MapTile::Exit);

    let mut rng = LegacyLcg::new(seed);
    let attempts = MOCK_BASE_FEATURES + seed % 4;
    let span_x = width.saturating_sub(2) as f64;
    let span_y = height.saturating_sub(2) as f64;
    let mut features = Vec::new();
    for _ in 0..attempts {
        let pos = Vec2::new(
            (rng.next_f64() * span_x).floor() as i32 + 1,
            (rng.next_f64() * span_y).floor() as i32 + 1,
        );
        if !matches!(grid.get(pos), Some(MapTile::Room | MapTile::Corridor)) {
            continue;
        }
        let (tile, description) = if rng.next_f64() < 0.5 {
            (MapTile::Treasure, TREASURE_DESCRIPTION)
        } else {
            (MapTile::Trap, TRAP_DESCRIPTION)
        };
        grid.set(pos, tile);
        features.push(PlacedFeature {
            pos,
            tile,
            description: description.to_string(),
        });
    }

    tracing::debug!(
        seed,
        attempts,
        placed = features.len(),
        "room layout generated"
    );

    RoomLayout {
        grid,
        seed,
        rooms: ROOMS.to_vec(),
        entrance,
        exit,
        features,
        metadata: LayoutMetadata {
            difficulty: seed.min(MOCK_MAX_DIFFICULTY),
            theme: Theme::from_seed(seed),
        },
    }
}

impl RoomLayout {
    /// Flat `{x,y,type}` records for every cell, with descriptions on the
    /// entrance, exit and placed features
    pub fn tile_records(&self) -> Vec<TileRecord> {
        self.grid
            .cells()
            .map(|(pos, &tile)| {
                let mut rec = TileRecord::new(pos, tile);
                rec.description = if pos == self.entrance {
                    Some(ENTRANCE_DESCRIPTION.to_string())
                } else if pos == self.exit {
                    Some(EXIT_DESCRIPTION.to_string())
                } else {
                    self.features
                        .iter()
                        .rev()
                        .find(|f| f.pos == pos)
                        .map(|f| f.description.clone())
                };
                rec
            })
            .collect()
    }

    /// Canonical dungeon: gameplay tiles become terrain, objects become
    /// features
    pub fn into_dungeon(self, header: DungeonHeader) -> Dungeon {
        let mut dungeon = Dungeon::from_header(header, self.grid.map(|t| t.terrain()));

        dungeon.rooms = self
            .rooms
            .iter()
            .enumerate()
            .map(|(i, rect)| Room {
                id: format!("room-{i}"),
                rect: *rect,
                tags: ROOM_TAGS.get(i).map(|t| vec![t.to_string()]),
            })
            .collect();

        dungeon.features = self
            .features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| {
                let (kind, hidden) = match f.tile {
                    MapTile::Treasure => (FeatureType::Chest, None),
                    MapTile::Trap => (FeatureType::Trap, Some(true)),
                    MapTile::Secret => (FeatureType::SecretDoor, Some(true)),
                    _ => return None,
                };
                let mut data = serde_json::Map::new();
                data.insert("description".into(), f.description.clone().into());
                Some(Feature {
                    id: format!("feature-{i}"),
                    kind,
                    pos: f.pos,
                    data: Some(data),
                    hidden,
                })
            })
            .collect();

        dungeon.entrances.push(self.entrance);
        dungeon.exits.push(self.exit);
        dungeon
    }
}
