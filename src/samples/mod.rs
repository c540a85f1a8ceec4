//! Built-in sample map.
//!
//! A hand-built 20x20 floor in the style of an old first-person crawler:
//! four quadrants split by a central cross, each with its own corridor
//! pattern, joined by openings in the cross and two long east-west halls.
//! Editors and renderers fall back to it when no map is stored.

use crate::grid::{MapGrid, Vec2};
use crate::schema::MapRow;
use crate::tiles::MapTile;

pub const SAMPLE_SIZE: usize = 20;
pub const SAMPLE_NAME: &str = "Wizardry Floor 1 (sample)";

struct Builder {
    grid: MapGrid,
}

impl Builder {
    fn wall(&mut self, x: i32, y: i32) {
        self.grid.set(Vec2::new(x, y), MapTile::Wall);
    }

    fn open(&mut self, x: i32, y: i32) {
        self.grid.set(Vec2::new(x, y), MapTile::Floor);
    }

    fn outline(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        for x in x1..=x2 {
            self.wall(x, y1);
            self.wall(x, y2);
        }
        for y in y1..=y2 {
            self.wall(x1, y);
            self.wall(x2, y);
        }
    }

    fn hrun(&mut self, x1: i32, y: i32, x2: i32) {
        for x in x1..=x2 {
            self.wall(x, y);
        }
    }

    fn vrun(&mut self, x: i32, y1: i32, y2: i32) {
        for y in y1..=y2 {
            self.wall(x, y);
        }
    }

    fn path(&mut self, points: &[(i32, i32)]) {
        for &(x, y) in points {
            self.open(x, y);
        }
    }
}

/// The sample floor as a gameplay grid
pub fn wizardry_floor_1() -> MapGrid {
    let n = SAMPLE_SIZE as i32;
    let mut b = Builder {
        grid: MapGrid::filled(SAMPLE_SIZE, SAMPLE_SIZE, MapTile::Floor),
    };

    b.outline(0, 0, n - 1, n - 1);

    // Central cross with one opening per arm segment
    b.vrun(10, 0, n - 1);
    b.hrun(0, 10, n - 1);
    b.path(&[(3, 10), (9, 10), (11, 10), (16, 10), (10, 3), (10, 9), (10, 11), (10, 16)]);

    // North-west: nested rings with a diagonal stair cut
    b.outline(1, 1, 8, 8);
    b.outline(2, 2, 6, 6);
    b.path(&[(1, 7), (3, 7), (3, 5), (5, 5), (5, 3), (7, 3), (7, 1)]);

    // North-east: comb
    b.outline(11, 1, 18, 8);
    b.vrun(12, 1, 8);
    b.vrun(14, 1, 8);
    b.vrun(16, 1, 8);
    b.hrun(12, 4, 17);
    b.hrun(12, 6, 15);

    // South-west: U path
    b.outline(1, 11, 8, 18);
    b.path(&[(1, 18), (1, 12), (3, 12), (3, 16), (6, 16), (6, 13), (2, 13)]);

    // South-east: loop around an inner box
    b.outline(11, 11, 18, 18);
    b.outline(13, 13, 16, 16);
    b.open(15, 13);
    b.open(13, 15);

    // Halls either side of the horizontal arm
    for x in 1..=18 {
        b.open(x, 9);
        b.open(x, 11);
    }

    b.grid
}

/// The sample floor as an unsaved map row (empty id)
pub fn sample_map_row() -> MapRow {
    MapRow::from_grid("", SAMPLE_NAME, &wizardry_floor_1())
}
