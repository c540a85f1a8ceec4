//! Seeded PRNG
//!
//! Deterministic random streams for generation:
//! - `Seed` accepts a string or an integer; both hash through FNV-1a 32
//! - `SeededRng` (mulberry32) is the canonical stream
//! - `LegacyLcg` follows the older linear-congruential recurrence in exact
//!   integer arithmetic
//!
//! Every stream is a plain value owned by one generation run. Nothing here is
//! global, so concurrent runs never share state.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    FNV_OFFSET_BASIS, FNV_PRIME, LCG_INCREMENT, LCG_MASK, LCG_MULTIPLIER, MULBERRY_INCREMENT,
};

/// FNV-1a over raw bytes, 32-bit.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
        (h ^ u32::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    #[error("seed must not be blank")]
    Blank,
}

/// Generation seed as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    /// Reject seeds that cannot identify a run
    pub fn validate(&self) -> Result<(), SeedError> {
        match self {
            Seed::Text(s) if s.trim().is_empty() => Err(SeedError::Blank),
            _ => Ok(()),
        }
    }

    /// 32-bit hash feeding the canonical stream.
    ///
    /// Numbers hash through their decimal form, so `5` and `"5"` agree.
    pub fn hash32(&self) -> u32 {
        match self {
            Seed::Number(n) => fnv1a_32(n.to_string().as_bytes()),
            Seed::Text(s) => fnv1a_32(s.as_bytes()),
        }
    }

    /// Integer view used by count formulas such as `3 + seed mod 4`.
    ///
    /// Numeric strings parse as numbers; anything else uses its hash.
    pub fn numeric_base(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(s) => s
                .trim()
                .parse::<u64>()
                .unwrap_or_else(|_| u64::from(self.hash32())),
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Seed {
    fn from(n: u64) -> Self {
        Seed::Number(n)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Text(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::Text(s)
    }
}

/// A deterministic stream of 32-bit words and unit floats
pub trait RandomStream {
    /// Advance the state and return the next output word
    fn next_word(&mut self) -> u32;

    /// Next float in [0, 1)
    fn next_f64(&mut self) -> f64;
}

// ============================================================
// Canonical stream: mulberry32
// ============================================================

/// Mulberry32 generator seeded from a 32-bit hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(state: u32) -> Self {
        Self { state }
    }

    pub fn from_seed_value(seed: &Seed) -> Self {
        Self::new(seed.hash32())
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomStream for SeededRng {
    fn next_word(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_word()) / 4_294_967_296.0
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_word());
        let hi = u64::from(self.next_word());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

// ============================================================
// Legacy stream: 31-bit LCG
// ============================================================

/// The older integer-seeded linear-congruential stream.
///
/// Floats divide by 2^31 so the output stays inside [0, 1).
///
/// The recurrence runs in exact wrapping integer arithmetic. The older web
/// client evaluated it in double precision, which rounds once the product
/// passes 2^53, so from the third draw on the two streams usually diverge.
/// Room-and-corridor features placed from this stream are therefore not
/// bit-compatible with layouts that client produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyLcg {
    state: u64,
}

impl LegacyLcg {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed & LCG_MASK,
        }
    }
}

impl RandomStream for LegacyLcg {
    fn next_word(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT)
            & LCG_MASK;
        self.state as u32
    }

    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_word()) / 2_147_483_648.0
    }
}

// ============================================================
// Algorithm selection
// ============================================================

/// Which stream a generation run draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngAlgorithm {
    #[default]
    Mulberry32,
    LegacyLcg,
}

impl RngAlgorithm {
    /// Build a fresh stream for `seed`
    pub fn stream(&self, seed: &Seed) -> Stream {
        match self {
            RngAlgorithm::Mulberry32 => Stream::Mulberry32(SeededRng::from_seed_value(seed)),
            RngAlgorithm::LegacyLcg => Stream::LegacyLcg(LegacyLcg::new(seed.numeric_base())),
        }
    }
}

/// A stream of either algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    Mulberry32(SeededRng),
    LegacyLcg(LegacyLcg),
}

impl RandomStream for Stream {
    fn next_word(&mut self) -> u32 {
        match self {
            Stream::Mulberry32(rng) => rng.next_word(),
            Stream::LegacyLcg(rng) => rng.next_word(),
        }
    }

    fn next_f64(&mut self) -> f64 {
        match self {
            Stream::Mulberry32(rng) => rng.next_f64(),
            Stream::LegacyLcg(rng) => rng.next_f64(),
        }
    }
}
