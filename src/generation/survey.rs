//! Batch survey: generate many seeds in parallel and report how playable the
//! results are. Each seed owns its own stream, so the rayon workers share
//! nothing.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{generate_with, random_walk, GenerationError, WalkParams};
use crate::navigation;
use crate::rng::Seed;
use crate::tiles::TileKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRow {
    pub seed: String,
    pub walkable: usize,
    pub doors: usize,
    pub playable: bool,
    /// Entrance connects to exit over walkable tiles
    pub reachable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub runs: usize,
    pub playable: usize,
    pub reachable: usize,
    pub min_walkable: usize,
    pub max_walkable: usize,
    pub mean_walkable: f64,
}

impl SurveySummary {
    pub fn from_rows(rows: &[SurveyRow]) -> Self {
        let runs = rows.len();
        let total: usize = rows.iter().map(|r| r.walkable).sum();
        Self {
            runs,
            playable: rows.iter().filter(|r| r.playable).count(),
            reachable: rows.iter().filter(|r| r.reachable).count(),
            min_walkable: rows.iter().map(|r| r.walkable).min().unwrap_or(0),
            max_walkable: rows.iter().map(|r| r.walkable).max().unwrap_or(0),
            mean_walkable: if runs == 0 {
                0.0
            } else {
                total as f64 / runs as f64
            },
        }
    }
}

fn survey_one(
    params: &WalkParams,
    seed: &Seed,
    min_walkable: usize,
) -> Result<SurveyRow, GenerationError> {
    let grid = generate_with(params, seed)?;
    let walkable = grid.walkable_count();
    let reachable = random_walk::endpoints(&grid)
        .is_some_and(|(entrance, exit)| navigation::is_reachable(&grid, entrance, exit));
    Ok(SurveyRow {
        seed: seed.to_string(),
        walkable,
        doors: grid.count(|t| *t == TileKind::Door),
        playable: walkable >= min_walkable,
        reachable,
    })
}

/// Survey `seeds` in parallel. Rows come back in input order.
pub fn survey(
    params: &WalkParams,
    seeds: &[Seed],
    min_walkable: usize,
) -> Result<Vec<SurveyRow>, GenerationError> {
    let rows: Vec<SurveyRow> = seeds
        .par_iter()
        .map(|seed| survey_one(params, seed, min_walkable))
        .collect::<Result<_, _>>()?;
    tracing::info!(runs = rows.len(), "survey complete");
    Ok(rows)
}
