//! Dungeon Procedural Core Library
//!
//! Deterministic dungeon maps from a seed:
//! - Tile semantics table shared by generation, collision and rendering
//! - Seeded PRNG streams (Mulberry32 over an FNV-1a seed hash, legacy LCG)
//! - Grid generation (random walk, fixed room-and-corridor layout, surveys)
//! - Dungeon schema, strict validator and logical-defect checks
//! - Legacy adapters (token grids, char maps, flat tile records, reference ids)
//! - Navigation contract (out-of-bounds as wall, abilities, reachability)
//! - Built-in sample map

pub mod config;
pub mod constants;
pub mod error;
pub mod generation;
pub mod grid;
pub mod legacy;
pub mod logging;
pub mod navigation;
pub mod rng;
pub mod samples;
pub mod schema;
pub mod tiles;

pub use error::DungeonError;
pub use generation::{generate, generate_dungeon, Algorithm, DungeonRequest, GenerationError};
pub use grid::{Grid, MapGrid, TileGrid, Vec2};
pub use rng::{RngAlgorithm, Seed};
pub use schema::{validate, Dungeon, ValidationError};
pub use tiles::{MapTile, TileKind, TileProperties, TileSemantics};
