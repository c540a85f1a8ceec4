//! Random-walk carving.
//!
//! 1. Fill with wall, start in the center and mark it floor.
//! 2. Take `width * height * steps_per_cell` steps. Each step draws one float
//!    and tries left, right, up, down in that order of thresholds; a move that
//!    would touch the border falls through to the next direction.
//! 3. Door pass over interior walls with exactly two floor neighbours. Only
//!    those candidates consume a draw.
//!
//! The border ring is never carved.

use super::WalkParams;
use crate::grid::{TileGrid, Vec2};
use crate::rng::RandomStream;
use crate::tiles::TileKind;

/// Dimensions must already satisfy `check_dimensions`; `steps` comes from
/// `WalkParams::step_count`.
pub fn carve(params: &WalkParams, steps: usize, rng: &mut impl RandomStream) -> TileGrid {
    let (width, height) = (params.width, params.height);
    let mut grid = TileGrid::filled(width, height, TileKind::Wall);

    let (mut x, mut y) = (width / 2, height / 2);
    grid.tiles[y][x] = TileKind::Floor;

    for _ in 0..steps {
        let r = rng.next_f64();
        if r < 0.25 && x > 1 {
            x -= 1;
        } else if r < 0.5 && x + 2 < width {
            x += 1;
        } else if r < 0.75 && y > 1 {
            y -= 1;
        } else if y + 2 < height {
            y += 1;
        }
        grid.tiles[y][x] = TileKind::Floor;
    }

    place_doors(&mut grid, params.door_chance, rng);
    grid
}

fn floor_neighbours(grid: &TileGrid, x: usize, y: usize) -> usize {
    [
        grid.tiles[y][x - 1],
        grid.tiles[y][x + 1],
        grid.tiles[y - 1][x],
        grid.tiles[y + 1][x],
    ]
    .into_iter()
    .filter(|t| *t == TileKind::Floor)
    .count()
}

/// Row-major pass; doors placed earlier in the pass count as non-floor for
/// later cells.
pub fn place_doors(grid: &mut TileGrid, chance: f64, rng: &mut impl RandomStream) -> usize {
    let mut placed = 0;
    for y in 1..grid.height.saturating_sub(1) {
        for x in 1..grid.width.saturating_sub(1) {
            if grid.tiles[y][x] != TileKind::Wall || floor_neighbours(grid, x, y) != 2 {
                continue;
            }
            if rng.next_f64() < chance {
                grid.tiles[y][x] = TileKind::Door;
                placed += 1;
            }
        }
    }
    placed
}

/// Entrance is the first floor cell row-major; exit the first floor cell
/// scanning backwards. `None` only for a grid without floor.
pub fn endpoints(grid: &TileGrid) -> Option<(Vec2, Vec2)> {
    let entrance = grid.find_first(|t| *t == TileKind::Floor)?;
    let exit = grid.find_last(|t| *t == TileKind::Floor)?;
    Some((entrance, exit))
}
