//! Consumer contract for renderers and movement checkers.
//!
//! Every read goes `tiles[y][x]` then the semantics table; anything off the
//! grid is wall. Both tile vocabularies are supported through `TileSemantics`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use crate::constants::MIN_WALKABLE_TILES;
use crate::grid::{Grid, Vec2};
use crate::tiles::{MovementRequirement, TileProperties, TileSemantics};

/// Tile at `pos`, wall when out of bounds
pub fn tile_at<T: TileSemantics>(grid: &Grid<T>, pos: Vec2) -> T {
    grid.tile_or_solid(pos)
}

/// Can a mover with `abilities` step onto a tile with `props`?
pub fn can_move_to(props: &TileProperties, abilities: &[MovementRequirement]) -> bool {
    props.can_enter(abilities)
}

/// Movement check against a grid position
pub fn can_move_to_pos<T: TileSemantics>(
    grid: &Grid<T>,
    pos: Vec2,
    abilities: &[MovementRequirement],
) -> bool {
    can_move_to(tile_at(grid, pos).properties(), abilities)
}

pub fn walkable_count<T: TileSemantics>(grid: &Grid<T>) -> usize {
    grid.walkable_count()
}

/// First walkable cell in row-major order (spawn point)
pub fn first_walkable<T: TileSemantics>(grid: &Grid<T>) -> Option<Vec2> {
    grid.find_first(|t| t.is_walkable())
}

/// Too few walkable tiles to be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("map has {walkable} walkable tiles, at least {required} are needed to be playable")]
pub struct ConnectivityDeficiency {
    pub walkable: usize,
    pub required: usize,
}

/// Reject maps below `threshold` walkable tiles. Returns the walkable count.
pub fn check_playable<T: TileSemantics>(
    grid: &Grid<T>,
    threshold: usize,
) -> Result<usize, ConnectivityDeficiency> {
    let walkable = grid.walkable_count();
    if walkable < threshold {
        tracing::warn!(walkable, threshold, "map rejected as unplayable");
        return Err(ConnectivityDeficiency {
            walkable,
            required: threshold,
        });
    }
    Ok(walkable)
}

/// `check_playable` with the standard threshold
pub fn check_playable_default<T: TileSemantics>(
    grid: &Grid<T>,
) -> Result<usize, ConnectivityDeficiency> {
    check_playable(grid, MIN_WALKABLE_TILES)
}

/// 4-connected flood fill over walkable tiles
pub fn is_reachable<T: TileSemantics>(grid: &Grid<T>, from: Vec2, to: Vec2) -> bool {
    let walkable = |p: Vec2| grid.in_bounds(p) && tile_at(grid, p).is_walkable();
    if !walkable(from) || !walkable(to) {
        return false;
    }
    if from == to {
        return true;
    }

    let mut seen = vec![false; grid.width * grid.height];
    let idx = |p: Vec2| p.y as usize * grid.width + p.x as usize;
    let mut queue = VecDeque::from([from]);
    seen[idx(from)] = true;
    while let Some(p) = queue.pop_front() {
        for n in p.neighbours() {
            if !walkable(n) || seen[idx(n)] {
                continue;
            }
            if n == to {
                return true;
            }
            seen[idx(n)] = true;
            queue.push_back(n);
        }
    }
    false
}

/// Tile census of a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridAnalysis {
    pub tile_count: usize,
    pub walkable_count: usize,
    pub tile_type_counts: BTreeMap<String, usize>,
    pub spawn_point: Option<Vec2>,
}

pub fn analyze<T: TileSemantics>(grid: &Grid<T>) -> GridAnalysis {
    let mut tile_type_counts = BTreeMap::new();
    let mut tile_count = 0;
    for (_, tile) in grid.cells() {
        tile_count += 1;
        *tile_type_counts.entry(tile.id().to_string()).or_insert(0) += 1;
    }
    GridAnalysis {
        tile_count,
        walkable_count: grid.walkable_count(),
        tile_type_counts,
        spawn_point: first_walkable(grid),
    }
}
