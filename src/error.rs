//! Crate-level error umbrella for callers that touch files and several
//! modules at once. Each module keeps its own error type.

use crate::config::ConfigError;
use crate::generation::GenerationError;
use crate::legacy::{DungeonRefError, LegacyRefError};
use crate::navigation::ConnectivityDeficiency;
use crate::schema::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum DungeonError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("Unplayable map: {0}")]
    Unplayable(#[from] ConnectivityDeficiency),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Legacy reference: {0}")]
    LegacyRef(#[from] LegacyRefError),
    #[error("Dungeon reference: {0}")]
    DungeonRef(#[from] DungeonRefError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DungeonError>;
