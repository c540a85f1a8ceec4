//! Centralized constants for the dungeon procedural core.
//!
//! Values shared by generation, validation and the navigation checks live here
//! so the generator and its consumers cannot drift apart. Per-module tables
//! (tile properties, legend characters) stay in their own modules.

// =====================================================
// Seeded PRNG
// =====================================================

/// FNV-1a 32-bit offset basis
pub const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime
pub const FNV_PRIME: u32 = 16_777_619;

/// Mulberry32 state increment (golden-ratio derived)
pub const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;

/// Legacy LCG multiplier
pub const LCG_MULTIPLIER: u64 = 1_103_515_245;

/// Legacy LCG increment
pub const LCG_INCREMENT: u64 = 12_345;

/// Legacy LCG modulus mask (31 bits)
pub const LCG_MASK: u64 = 0x7fff_ffff;

// =====================================================
// Grid generation
// =====================================================

/// Default grid width of the random-walk generator
pub const DEFAULT_WIDTH: usize = 25;

/// Default grid height of the random-walk generator
pub const DEFAULT_HEIGHT: usize = 17;

/// Smallest dimension that still leaves an interior cell inside the border
pub const MIN_DIMENSION: usize = 3;

/// Largest accepted dimension (keeps a single run in the low-millisecond range)
pub const MAX_DIMENSION: usize = 512;

/// Random-walk steps per grid cell: steps = width * height * WALK_STEPS_PER_CELL
pub const WALK_STEPS_PER_CELL: usize = 4;

/// Largest accepted steps-per-cell setting
pub const MAX_WALK_STEPS_PER_CELL: usize = 64;

/// Ceiling on the total number of walk steps in one run
pub const MAX_WALK_STEPS: usize = MAX_DIMENSION * MAX_DIMENSION * MAX_WALK_STEPS_PER_CELL;

/// Chance that an eligible wall between two floors becomes a door
pub const DOOR_CHANCE: f64 = 0.03;

/// Width of the fixed room-and-corridor layout
pub const MOCK_WIDTH: usize = 20;

/// Height of the fixed room-and-corridor layout
pub const MOCK_HEIGHT: usize = 15;

/// Baseline feature count of the room-and-corridor layout (plus seed mod 4)
pub const MOCK_BASE_FEATURES: u64 = 3;

/// Difficulty cap reported in room-and-corridor metadata
pub const MOCK_MAX_DIFFICULTY: u64 = 10;

// =====================================================
// Dungeon metadata
// =====================================================

/// Default dungeon time-to-live in seconds (15 minutes)
pub const DEFAULT_TTL_SECONDS: u64 = 900;

/// Default dungeon level
pub const DEFAULT_LEVEL: u32 = 1;

// =====================================================
// Playability
// =====================================================

/// Minimum walkable tiles before a map is considered playable
pub const MIN_WALKABLE_TILES: usize = 20;

/// Upper bound for a level token when parsing legacy reference ids (exclusive)
pub const LEGACY_MAX_BARE_LEVEL: u32 = 100;
