//! Canonical 2D tile grid.
//!
//! Row-major, addressed as `tiles[y][x]`. The grid is generic over the tile
//! vocabulary so the schema grid (`TileGrid`) and the gameplay grid (`MapGrid`)
//! share one shape and one set of accessors.

use serde::{Deserialize, Serialize};

use crate::tiles::{MapTile, TileKind, TileSemantics};

/// Integer grid position
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 4-connected neighbours (left, right, up, down)
    pub fn neighbours(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x - 1, self.y),
            Vec2::new(self.x + 1, self.y),
            Vec2::new(self.x, self.y - 1),
            Vec2::new(self.x, self.y + 1),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<T>>,
}

/// Grid in the `Dungeon` schema vocabulary
pub type TileGrid = Grid<TileKind>;

/// Grid in the gameplay vocabulary
pub type MapGrid = Grid<MapTile>;

impl<T: Clone> Grid<T> {
    /// A `width` x `height` grid with every cell set to `fill`
    pub fn filled(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![fill; width]; height],
        }
    }
}

impl<T> Grid<T> {
    /// Every row has exactly `width` cells and there are `height` rows
    pub fn is_well_formed(&self) -> bool {
        self.tiles.len() == self.height && self.tiles.iter().all(|row| row.len() == self.width)
    }

    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Vec2) -> Option<&T> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.tiles.get(pos.y as usize)?.get(pos.x as usize)
    }

    /// Replace a single tile. Returns false when `pos` is outside the grid.
    pub fn set(&mut self, pos: Vec2, tile: T) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        match self
            .tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
        {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }

    /// All cells with their positions, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Vec2, &T)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (Vec2::new(x as i32, y as i32), tile))
        })
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            tiles: self
                .tiles
                .iter()
                .map(|row| row.iter().map(&mut f).collect())
                .collect(),
        }
    }

    /// First cell matching `pred` in row-major order
    pub fn find_first(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Vec2> {
        self.cells().find(|(_, t)| pred(t)).map(|(p, _)| p)
    }

    /// First cell matching `pred` scanning from the bottom-right corner backwards
    pub fn find_last(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Vec2> {
        self.tiles.iter().enumerate().rev().find_map(|(y, row)| {
            row.iter()
                .enumerate()
                .rev()
                .find(|(_, t)| pred(t))
                .map(|(x, _)| Vec2::new(x as i32, y as i32))
        })
    }

    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.tiles.iter().flatten().filter(|t| pred(t)).count()
    }
}

impl<T: TileSemantics> Grid<T> {
    /// Tile at `pos`; anything off the grid reads as the solid tile
    pub fn tile_or_solid(&self, pos: Vec2) -> T {
        self.get(pos).copied().unwrap_or(T::SOLID)
    }

    pub fn walkable_count(&self) -> usize {
        self.count(|t| t.is_walkable())
    }
}
