//! Generator configuration.
//!
//! A JSON file whose every field is optional; missing fields take the
//! defaults below. An absent `width`/`height` follows the algorithm's own
//! default size. Loaded once by the CLI and turned into a `DungeonRequest`
//! per seed.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{
    DEFAULT_LEVEL, DEFAULT_TTL_SECONDS, DOOR_CHANCE, MAX_DIMENSION, MAX_WALK_STEPS_PER_CELL,
    MIN_DIMENSION, MIN_WALKABLE_TILES, WALK_STEPS_PER_CELL,
};
use crate::generation::{Algorithm, DungeonRequest, WalkParams};
use crate::logging::TracingConfig;
use crate::rng::{RngAlgorithm, Seed};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
    pub algorithm: Algorithm,
    pub rng: RngAlgorithm,
    pub walk_steps_per_cell: usize,
    pub door_chance: f64,
    pub min_walkable_tiles: usize,
    pub level: u32,
    pub ttl_seconds: u64,
    pub tracing: TracingConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            algorithm: Algorithm::RandomWalk,
            rng: RngAlgorithm::Mulberry32,
            walk_steps_per_cell: WALK_STEPS_PER_CELL,
            door_chance: DOOR_CHANCE,
            min_walkable_tiles: MIN_WALKABLE_TILES,
            level: DEFAULT_LEVEL,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            tracing: TracingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "generator config loaded");
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Explicit size, falling back per axis to the algorithm's default
    pub fn size(&self) -> (usize, usize) {
        let (width, height) = self.algorithm.default_size();
        (self.width.unwrap_or(width), self.height.unwrap_or(height))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.size();
        for (field, value) in [("width", width), ("height", height)] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(invalid(
                    field,
                    format!("must lie in {MIN_DIMENSION}..={MAX_DIMENSION}, got {value}"),
                ));
            }
        }
        if !(1..=MAX_WALK_STEPS_PER_CELL).contains(&self.walk_steps_per_cell) {
            return Err(invalid(
                "walk_steps_per_cell",
                format!(
                    "must lie in 1..={MAX_WALK_STEPS_PER_CELL}, got {}",
                    self.walk_steps_per_cell
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.door_chance) {
            return Err(invalid(
                "door_chance",
                format!("must lie in [0, 1], got {}", self.door_chance),
            ));
        }
        if self.level == 0 {
            return Err(invalid("level", "must be at least 1"));
        }
        if self.ttl_seconds == 0 {
            return Err(invalid("ttl_seconds", "must be positive"));
        }
        Ok(())
    }

    pub fn to_request(&self, seed: impl Into<Seed>) -> DungeonRequest {
        let (width, height) = self.size();
        let mut request = DungeonRequest::new(width, height, seed);
        request.level = self.level;
        request.ttl_seconds = self.ttl_seconds;
        request.algorithm = self.algorithm;
        request.rng = self.rng;
        request.steps_per_cell = self.walk_steps_per_cell;
        request.door_chance = self.door_chance;
        request
    }

    pub fn walk_params(&self) -> WalkParams {
        let (width, height) = self.size();
        WalkParams {
            width,
            height,
            steps_per_cell: self.walk_steps_per_cell,
            door_chance: self.door_chance,
            rng: self.rng,
        }
    }
}
