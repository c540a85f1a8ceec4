//! Tile Semantics Table
//!
//! The single source of truth for what a tile *means*:
//! - Canonical schema vocabulary (`TileKind`) used by `Dungeon` grids
//! - Gameplay vocabulary (`MapTile`) used by map rows and the room/corridor layout
//! - One static, versioned properties table shared by generation, movement
//!   checks and rendering
//!
//! Lookups are total. An unknown identifier resolves to the default floor or
//! default wall row depending on the caller's `FallbackPolicy`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Bumped whenever a row of `TILE_TABLE` changes meaning
pub const TABLE_VERSION: u32 = 1;

/// Broad tile category used by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileCategory {
    Floor,
    Wall,
    Object,
}

/// Ability a mover needs to enter a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementRequirement {
    None,
    Fly,
    Swim,
    Climb,
    Teleport,
}

impl MovementRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fly => "fly",
            Self::Swim => "swim",
            Self::Climb => "climb",
            Self::Teleport => "teleport",
        }
    }
}

/// Properties record for one tile identifier.
///
/// Strings are `Cow` so the static table borrows while custom texture
/// properties loaded from a map row own their data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileProperties {
    pub id: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub description: Cow<'static, str>,
    pub category: TileCategory,
    pub walkable: bool,
    pub movement_requirement: MovementRequirement,
    pub blocks_vision: bool,
}

impl TileProperties {
    const fn row(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        category: TileCategory,
        walkable: bool,
        movement_requirement: MovementRequirement,
        blocks_vision: bool,
    ) -> Self {
        Self {
            id: Cow::Borrowed(id),
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            category,
            walkable,
            movement_requirement,
            blocks_vision,
        }
    }

    /// Can a mover holding `abilities` enter this tile?
    ///
    /// The tile must be walkable, and a movement requirement other than `none`
    /// must be among the mover's abilities.
    pub fn can_enter(&self, abilities: &[MovementRequirement]) -> bool {
        if !self.walkable {
            return false;
        }
        match self.movement_requirement {
            MovementRequirement::None => true,
            required => abilities.contains(&required),
        }
    }
}

use MovementRequirement as Req;
use TileCategory as Cat;

// Row order matters only for readability; lookups go by id.
#[rustfmt::skip]
static TILE_TABLE: [TileProperties; 16] = [
    // --- shared by both vocabularies ---
    TileProperties::row("floor", "Stone Floor", "A solid stone floor worn smooth by countless footsteps.", Cat::Floor, true, Req::None, false),
    TileProperties::row("wall", "Stone Wall", "A sturdy stone wall that blocks your path.", Cat::Wall, false, Req::None, true),
    TileProperties::row("door", "Wooden Door", "A sturdy wooden door that can be opened or closed.", Cat::Wall, true, Req::None, false),
    TileProperties::row("water", "Deep Water", "Deep, clear water that requires special abilities to cross safely.", Cat::Floor, false, Req::Fly, false),
    // --- canonical schema vocabulary ---
    TileProperties::row("stairs_up", "Stairs Up", "A stairway climbing back toward the previous level.", Cat::Floor, true, Req::None, false),
    TileProperties::row("stairs_down", "Stairs Down", "A stairway descending deeper into the dungeon.", Cat::Floor, true, Req::None, false),
    TileProperties::row("lava", "Molten Lava", "A river of molten rock. Nothing walks here and lives.", Cat::Floor, false, Req::Fly, false),
    TileProperties::row("void", "Bottomless Void", "An empty chasm with no floor in sight.", Cat::Wall, false, Req::Teleport, false),
    // --- gameplay vocabulary ---
    TileProperties::row("room", "Dungeon Room", "A spacious room within the dungeon, possibly containing secrets.", Cat::Floor, true, Req::None, false),
    TileProperties::row("corridor", "Dungeon Corridor", "A narrow stone corridor connecting different areas of the dungeon.", Cat::Floor, true, Req::None, false),
    TileProperties::row("entrance", "Dungeon Entrance", "The entrance to this level of the dungeon.", Cat::Floor, true, Req::None, false),
    TileProperties::row("exit", "Dungeon Exit", "The exit leading to the next level or out of the dungeon.", Cat::Floor, true, Req::None, false),
    TileProperties::row("treasure", "Treasure Chest", "A gleaming treasure chest filled with gold and precious items.", Cat::Object, true, Req::None, false),
    TileProperties::row("trap", "Hidden Trap", "A dangerous trap hidden in the floor. Proceed with caution!", Cat::Floor, true, Req::None, false),
    TileProperties::row("secret", "Secret Area", "A hidden area containing valuable treasures or important items.", Cat::Floor, true, Req::None, false),
    TileProperties::row("tree", "Ancient Tree", "A massive ancient tree with thick bark and sprawling branches.", Cat::Object, false, Req::None, true),
];

const FLOOR_ROW: usize = 0;
const WALL_ROW: usize = 1;

/// Which default an unknown identifier resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Renderer/client context: unknown tiles draw and behave as floor
    Floor,
    /// Corridor logic and out-of-bounds reads: unknown tiles are solid
    Wall,
}

/// Every row of the table, in declaration order
pub fn table() -> &'static [TileProperties] {
    &TILE_TABLE
}

fn find_row(id: &str) -> Option<&'static TileProperties> {
    TILE_TABLE.iter().find(|row| row.id == id)
}

/// Resolve any tile identifier to its properties (never fails).
pub fn lookup(id: &str, policy: FallbackPolicy) -> &'static TileProperties {
    if let Some(row) = find_row(id) {
        return row;
    }
    tracing::debug!(tile = id, ?policy, "unknown tile id, using fallback row");
    match policy {
        FallbackPolicy::Floor => &TILE_TABLE[FLOOR_ROW],
        FallbackPolicy::Wall => &TILE_TABLE[WALL_ROW],
    }
}

/// Walkability of any tile identifier (unknown ids follow `policy`)
pub fn is_walkable(id: &str, policy: FallbackPolicy) -> bool {
    lookup(id, policy).walkable
}

/// Vision blocking of any tile identifier (unknown ids follow `policy`)
pub fn blocks_vision(id: &str, policy: FallbackPolicy) -> bool {
    lookup(id, policy).blocks_vision
}

// ============================================================
// Shared behaviour of both vocabularies
// ============================================================

/// A closed tile vocabulary backed by the shared table.
pub trait TileSemantics: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The solid tile used for out-of-bounds reads and blank fills
    const SOLID: Self;

    fn id(&self) -> &'static str;

    fn from_id(id: &str) -> Option<Self>;

    fn properties(&self) -> &'static TileProperties {
        // Every variant has a row; the fallback only guards a table edit gone wrong.
        lookup(self.id(), FallbackPolicy::Wall)
    }

    fn is_walkable(&self) -> bool {
        self.properties().walkable
    }

    fn blocks_vision(&self) -> bool {
        self.properties().blocks_vision
    }
}

// ============================================================
// Canonical schema vocabulary
// ============================================================

/// Tile kinds accepted by the `Dungeon` schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Wall,
    Floor,
    Door,
    StairsUp,
    StairsDown,
    Water,
    Lava,
    Void,
}

impl TileKind {
    pub const ALL: [TileKind; 8] = [
        TileKind::Wall,
        TileKind::Floor,
        TileKind::Door,
        TileKind::StairsUp,
        TileKind::StairsDown,
        TileKind::Water,
        TileKind::Lava,
        TileKind::Void,
    ];
}

impl TileSemantics for TileKind {
    const SOLID: Self = TileKind::Wall;

    fn id(&self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::Door => "door",
            Self::StairsUp => "stairs_up",
            Self::StairsDown => "stairs_down",
            Self::Water => "water",
            Self::Lava => "lava",
            Self::Void => "void",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================
// Gameplay vocabulary
// ============================================================

/// Tile ids used by map rows, the editor and the room/corridor layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapTile {
    Room,
    Corridor,
    Entrance,
    Exit,
    Treasure,
    Trap,
    Secret,
    Tree,
    Water,
    Door,
    Wall,
    Floor,
}

impl MapTile {
    pub const ALL: [MapTile; 12] = [
        MapTile::Room,
        MapTile::Corridor,
        MapTile::Entrance,
        MapTile::Exit,
        MapTile::Treasure,
        MapTile::Trap,
        MapTile::Secret,
        MapTile::Tree,
        MapTile::Water,
        MapTile::Door,
        MapTile::Wall,
        MapTile::Floor,
    ];

    /// Parse an id, resolving unknown ids per `policy` (logged).
    pub fn from_id_or(id: &str, policy: FallbackPolicy) -> Self {
        Self::from_id(id).unwrap_or_else(|| {
            tracing::warn!(tile = id, ?policy, "unknown map tile id");
            match policy {
                FallbackPolicy::Floor => MapTile::Floor,
                FallbackPolicy::Wall => MapTile::Wall,
            }
        })
    }

    /// Terrain underneath this tile in the canonical vocabulary.
    ///
    /// Object-like tiles (treasure, trap, secret) become floor; the object itself
    /// is carried as a `Feature` by the caller.
    pub fn terrain(&self) -> TileKind {
        match self {
            Self::Room | Self::Corridor | Self::Floor => TileKind::Floor,
            Self::Treasure | Self::Trap | Self::Secret => TileKind::Floor,
            Self::Entrance => TileKind::StairsUp,
            Self::Exit => TileKind::StairsDown,
            Self::Tree | Self::Wall => TileKind::Wall,
            Self::Water => TileKind::Water,
            Self::Door => TileKind::Door,
        }
    }
}

impl TileSemantics for MapTile {
    const SOLID: Self = MapTile::Wall;

    fn id(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Corridor => "corridor",
            Self::Entrance => "entrance",
            Self::Exit => "exit",
            Self::Treasure => "treasure",
            Self::Trap => "trap",
            Self::Secret => "secret",
            Self::Tree => "tree",
            Self::Water => "water",
            Self::Door => "door",
            Self::Wall => "wall",
            Self::Floor => "floor",
        }
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

impl fmt::Display for MapTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_kind_has_its_own_row() {
        for kind in TileKind::ALL {
            assert_eq!(kind.properties().id, kind.id(), "{kind:?} resolved to wrong row");
        }
        for tile in MapTile::ALL {
            assert_eq!(tile.properties().id, tile.id(), "{tile:?} resolved to wrong row");
        }
    }

    #[test]
    fn test_table_ids_unique() {
        let ids: HashSet<_> = table().iter().map(|r| r.id.as_ref()).collect();
        assert_eq!(ids.len(), table().len());
    }

    #[test]
    fn test_unknown_id_fallback_policy() {
        assert_eq!(lookup("lava-ish", FallbackPolicy::Floor).id, "floor");
        assert_eq!(lookup("lava-ish", FallbackPolicy::Wall).id, "wall");
        assert!(is_walkable("???", FallbackPolicy::Floor));
        assert!(!is_walkable("???", FallbackPolicy::Wall));
        assert!(blocks_vision("???", FallbackPolicy::Wall));
    }

    #[test]
    fn test_core_walkability() {
        assert!(TileKind::Floor.is_walkable());
        assert!(TileKind::Door.is_walkable());
        assert!(TileKind::StairsUp.is_walkable());
        assert!(TileKind::StairsDown.is_walkable());
        assert!(!TileKind::Wall.is_walkable());
        assert!(!TileKind::Water.is_walkable());
        assert!(!TileKind::Lava.is_walkable());
        assert!(!TileKind::Void.is_walkable());
        assert!(TileKind::Wall.blocks_vision());
        assert!(!TileKind::Door.blocks_vision());
    }

    #[test]
    fn test_generator_tags_match_table() {
        // Every tile the room/corridor layout places on the walkable path
        for tile in [
            MapTile::Room,
            MapTile::Corridor,
            MapTile::Entrance,
            MapTile::Exit,
            MapTile::Treasure,
            MapTile::Trap,
        ] {
            assert!(tile.is_walkable(), "{tile} must be walkable");
        }
        assert!(!MapTile::Tree.is_walkable());
        assert!(MapTile::Tree.blocks_vision());
    }

    #[test]
    fn test_movement_requirements() {
        let water = TileKind::Water.properties();
        assert_eq!(water.movement_requirement, MovementRequirement::Fly);
        assert!(!water.can_enter(&[]));
        assert!(
            !water.can_enter(&[MovementRequirement::Fly]),
            "non-walkable tiles stay closed regardless of abilities"
        );
        assert!(TileKind::Floor.properties().can_enter(&[]));
        assert!(!TileKind::Wall.properties().can_enter(&[MovementRequirement::Fly]));

        let mut ledge = TileKind::Floor.properties().clone();
        ledge.movement_requirement = MovementRequirement::Climb;
        assert!(!ledge.can_enter(&[]));
        assert!(ledge.can_enter(&[MovementRequirement::Climb]));
    }

    #[test]
    fn test_terrain_mapping() {
        assert_eq!(MapTile::Room.terrain(), TileKind::Floor);
        assert_eq!(MapTile::Entrance.terrain(), TileKind::StairsUp);
        assert_eq!(MapTile::Exit.terrain(), TileKind::StairsDown);
        assert_eq!(MapTile::Tree.terrain(), TileKind::Wall);
        for tile in MapTile::ALL {
            assert_eq!(
                tile.terrain().is_walkable(),
                tile.is_walkable(),
                "terrain of {tile} changes walkability"
            );
        }
    }

    #[test]
    fn test_serde_ids_match_table_ids() {
        for kind in TileKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
        for tile in MapTile::ALL {
            let json = serde_json::to_string(&tile).unwrap();
            assert_eq!(json, format!("\"{}\"", tile.id()));
        }
    }

    #[test]
    fn test_properties_json_shape() {
        let json = serde_json::to_value(TileKind::Water.properties()).unwrap();
        assert_eq!(json["movementRequirement"], "fly");
        assert_eq!(json["blocksVision"], false);
        assert_eq!(json["category"], "floor");
    }
}
