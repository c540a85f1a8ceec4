//! Grid Generator
//!
//! Turns a seed into a grid or a full `Dungeon`:
//! - `generate`: random-walk carving plus a door pass, the default generator
//! - `generate_rooms_and_corridors`: the fixed room/corridor layout with seeded
//!   features
//! - `generate_dungeon`: either of the above wrapped in dungeon metadata
//! - `survey`: many seeds in parallel
//!
//! Generation is a pure function of its inputs. Grids are always well-formed;
//! connectivity is not guaranteed and is left to `navigation::check_playable`.

pub mod random_walk;
pub mod rooms;
pub mod survey;

pub use rooms::{
    generate_rooms_and_corridors, LayoutMetadata, PlacedFeature, RoomLayout, Theme,
};
pub use survey::{survey, SurveyRow, SurveySummary};

use chrono::{DateTime, Utc};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HEIGHT, DEFAULT_LEVEL, DEFAULT_TTL_SECONDS, DEFAULT_WIDTH, DOOR_CHANCE, MAX_DIMENSION,
    MAX_WALK_STEPS, MAX_WALK_STEPS_PER_CELL, MIN_DIMENSION, MOCK_HEIGHT, MOCK_WIDTH,
    WALK_STEPS_PER_CELL,
};
use crate::grid::{TileGrid, Vec2};
use crate::logging::TimingSpan;
use crate::rng::{RngAlgorithm, Seed, SeedError};
use crate::schema::{Dungeon, DungeonHeader};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("precondition failed: {0}")]
    Precondition(String),
}

impl From<SeedError> for GenerationError {
    fn from(e: SeedError) -> Self {
        GenerationError::Precondition(e.to_string())
    }
}

/// Which layout generator a request runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    RandomWalk,
    RoomsAndCorridors,
}

impl Algorithm {
    /// Grid size used when the caller names none
    pub fn default_size(self) -> (usize, usize) {
        match self {
            Algorithm::RandomWalk => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            Algorithm::RoomsAndCorridors => (MOCK_WIDTH, MOCK_HEIGHT),
        }
    }
}

pub fn check_dimensions(width: usize, height: usize) -> Result<(), GenerationError> {
    for (name, value) in [("width", width), ("height", height)] {
        if value < MIN_DIMENSION {
            return Err(GenerationError::Precondition(format!(
                "{name} must be at least {MIN_DIMENSION}, got {value}"
            )));
        }
        if value > MAX_DIMENSION {
            return Err(GenerationError::Precondition(format!(
                "{name} must be at most {MAX_DIMENSION}, got {value}"
            )));
        }
    }
    Ok(())
}

// ============================================================
// Random walk
// ============================================================

/// Tunables of the random-walk generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    pub width: usize,
    pub height: usize,
    pub steps_per_cell: usize,
    pub door_chance: f64,
    pub rng: RngAlgorithm,
}

impl WalkParams {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            steps_per_cell: WALK_STEPS_PER_CELL,
            door_chance: DOOR_CHANCE,
            rng: RngAlgorithm::default(),
        }
    }

    /// Total walk steps, or a precondition error when the product is out of
    /// range
    pub fn step_count(&self) -> Result<usize, GenerationError> {
        if !(1..=MAX_WALK_STEPS_PER_CELL).contains(&self.steps_per_cell) {
            return Err(GenerationError::Precondition(format!(
                "steps per cell must lie in 1..={MAX_WALK_STEPS_PER_CELL}, got {}",
                self.steps_per_cell
            )));
        }
        self.width
            .checked_mul(self.height)
            .and_then(|cells| cells.checked_mul(self.steps_per_cell))
            .filter(|steps| *steps <= MAX_WALK_STEPS)
            .ok_or_else(|| {
                GenerationError::Precondition(format!(
                    "{}x{} grid at {} steps per cell exceeds {MAX_WALK_STEPS} steps",
                    self.width, self.height, self.steps_per_cell
                ))
            })
    }
}

/// Random-walk grid with default tunables
pub fn generate(
    width: usize,
    height: usize,
    seed: impl Into<Seed>,
) -> Result<TileGrid, GenerationError> {
    generate_with(&WalkParams::new(width, height), &seed.into())
}

pub fn generate_with(params: &WalkParams, seed: &Seed) -> Result<TileGrid, GenerationError> {
    check_dimensions(params.width, params.height)?;
    let steps = params.step_count()?;
    seed.validate()?;
    if !(0.0..=1.0).contains(&params.door_chance) {
        return Err(GenerationError::Precondition(format!(
            "door chance must lie in [0, 1], got {}",
            params.door_chance
        )));
    }
    let mut stream = params.rng.stream(seed);
    let grid = random_walk::carve(params, steps, &mut stream);
    tracing::debug!(
        width = params.width,
        height = params.height,
        %seed,
        walkable = grid.walkable_count(),
        "random walk generated"
    );
    Ok(grid)
}

// ============================================================
// Full dungeon
// ============================================================

/// Everything `generate_dungeon` needs
#[derive(Debug, Clone, PartialEq)]
pub struct DungeonRequest {
    pub width: usize,
    pub height: usize,
    pub seed: Seed,
    pub level: u32,
    pub ttl_seconds: u64,
    pub algorithm: Algorithm,
    pub rng: RngAlgorithm,
    pub steps_per_cell: usize,
    pub door_chance: f64,
    /// Creation time; `None` means now
    pub created_at: Option<DateTime<Utc>>,
}

impl DungeonRequest {
    pub fn new(width: usize, height: usize, seed: impl Into<Seed>) -> Self {
        Self {
            width,
            height,
            seed: seed.into(),
            level: DEFAULT_LEVEL,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            algorithm: Algorithm::default(),
            rng: RngAlgorithm::default(),
            steps_per_cell: WALK_STEPS_PER_CELL,
            door_chance: DOOR_CHANCE,
            created_at: None,
        }
    }

    pub fn walk_params(&self) -> WalkParams {
        WalkParams {
            width: self.width,
            height: self.height,
            steps_per_cell: self.steps_per_cell,
            door_chance: self.door_chance,
            rng: self.rng,
        }
    }
}

/// Stable id for everything that shapes the layout: seed, level, size,
/// algorithm and stream
pub fn dungeon_id(request: &DungeonRequest) -> String {
    let algorithm: u64 = match request.algorithm {
        Algorithm::RandomWalk => 0,
        Algorithm::RoomsAndCorridors => 1,
    };
    let stream: u64 = match request.rng {
        RngAlgorithm::Mulberry32 => 0,
        RngAlgorithm::LegacyLcg => 1,
    };
    let words = [
        (u64::from(request.seed.hash32()) << 32) | u64::from(request.level),
        request.width as u64,
        request.height as u64,
        algorithm | (stream << 8),
    ];
    let mut key = [0u8; 32];
    for (chunk, word) in key.chunks_exact_mut(8).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    let mut rng = Xoshiro256PlusPlus::from_seed(key);
    format!("dgn-{:016x}", rng.next_u64())
}

pub fn generate_dungeon(request: &DungeonRequest) -> Result<Dungeon, GenerationError> {
    let _timing = TimingSpan::new("generate_dungeon");
    if request.level < 1 {
        return Err(GenerationError::Precondition("level must be at least 1".into()));
    }
    if request.ttl_seconds == 0 {
        return Err(GenerationError::Precondition("ttl must be positive".into()));
    }
    check_dimensions(request.width, request.height)?;
    request.seed.validate()?;

    let header = DungeonHeader {
        id: dungeon_id(request),
        seed: request.seed.to_string(),
        level: request.level,
        ttl_seconds: request.ttl_seconds,
        created_at: request.created_at.unwrap_or_else(Utc::now),
    };

    let dungeon = match request.algorithm {
        Algorithm::RandomWalk => {
            let grid = generate_with(&request.walk_params(), &request.seed)?;
            let (entrance, exit) = random_walk::endpoints(&grid).unwrap_or_else(|| {
                // The walk always marks its start cell
                let center = Vec2::new((request.width / 2) as i32, (request.height / 2) as i32);
                (center, center)
            });
            let mut d = Dungeon::from_header(header, grid);
            d.entrances.push(entrance);
            d.exits.push(exit);
            d
        }
        Algorithm::RoomsAndCorridors => {
            let layout = generate_rooms_and_corridors(
                request.width,
                request.height,
                request.seed.numeric_base(),
            );
            layout.into_dungeon(header)
        }
    };

    tracing::info!(
        id = %dungeon.id,
        algorithm = ?request.algorithm,
        width = request.width,
        height = request.height,
        "dungeon generated"
    );
    Ok(dungeon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::logical_defects;
    use crate::tiles::TileKind;

    #[test]
    fn test_deterministic_generation() {
        let a = generate(25, 17, "abc").unwrap();
        let b = generate(25, 17, "abc").unwrap();
        assert_eq!(a, b, "Same seed must produce the same grid");
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate(25, 17, "abc").unwrap();
        let b = generate(25, 17, "abd").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_preconditions() {
        for (w, h, seed) in [(2, 10, "x"), (10, 0, "x"), (10, 10, "  ")] {
            assert!(matches!(
                generate(w, h, seed),
                Err(GenerationError::Precondition(_))
            ));
        }
        assert!(generate(MAX_DIMENSION + 1, 10, "x").is_err());
        assert!(generate(3, 3, "x").is_ok(), "smallest grid has one interior cell");
    }

    #[test]
    fn test_bad_door_chance_rejected() {
        let mut params = WalkParams::new(10, 10);
        params.door_chance = 1.5;
        assert!(generate_with(&params, &Seed::from("x")).is_err());
    }

    #[test]
    fn test_dungeon_endpoints_are_valid() {
        let d = generate_dungeon(&DungeonRequest::new(25, 17, "abc")).unwrap();
        assert_eq!(d.entrances.len(), 1);
        assert_eq!(d.exits.len(), 1);
        assert!(logical_defects(&d).is_empty());
        let entrance = d.entrances[0];
        assert_eq!(
            d.grid.tiles[entrance.y as usize][entrance.x as usize],
            TileKind::Floor
        );
        assert_eq!(d.seed, "abc");
        assert_eq!(d.ttl_seconds, 900);
    }

    #[test]
    fn test_dungeon_id_stable() {
        let a = generate_dungeon(&DungeonRequest::new(25, 17, 77u64)).unwrap();
        let b = generate_dungeon(&DungeonRequest::new(25, 17, "77")).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.grid, b.grid, "numeric and string seeds agree");
        let base = DungeonRequest::new(25, 17, 77u64);
        let mut deeper = base.clone();
        deeper.level = 2;
        assert_ne!(dungeon_id(&base), dungeon_id(&deeper));
    }

    #[test]
    fn test_dungeon_id_tracks_shape_and_algorithm() {
        let base = DungeonRequest::new(25, 17, "abc");
        let mut wider = base.clone();
        wider.width = 26;
        let mut rooms = base.clone();
        rooms.algorithm = Algorithm::RoomsAndCorridors;
        let mut lcg = base.clone();
        lcg.rng = RngAlgorithm::LegacyLcg;
        let ids = [&base, &wider, &rooms, &lcg].map(dungeon_id);
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(dungeon_id(&base), dungeon_id(&base.clone()));
    }

    #[test]
    fn test_rooms_algorithm_through_request() {
        let mut req = DungeonRequest::new(20, 15, 5u64);
        req.algorithm = Algorithm::RoomsAndCorridors;
        let d = generate_dungeon(&req).unwrap();
        assert_eq!(d.entrances, vec![Vec2::new(1, 1)]);
        assert_eq!(d.exits, vec![Vec2::new(18, 13)]);
        assert_eq!(d.rooms.len(), 5);
        assert!(logical_defects(&d).is_empty());
    }

    #[test]
    fn test_level_must_be_positive() {
        let mut req = DungeonRequest::new(25, 17, "abc");
        req.level = 0;
        assert!(generate_dungeon(&req).is_err());
    }
}
