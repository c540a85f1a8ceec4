//! Dungeon reference identifiers.
//!
//! The legacy id is `guild-dungeonNumber-level-timestamp-suffix` joined with
//! `-`, but guild names may contain `-` themselves, so the legacy form is
//! parsed right-to-left with heuristics. Every heuristic that fires is
//! recorded on the result as a `RefNote`.
//!
//! New ids use `DungeonRef`, whose text form puts the numeric fields first and
//! the guild last (`7.2.1700000000000.x1y2:my-guild`), so it parses without
//! guessing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LEVEL, LEGACY_MAX_BARE_LEVEL};

// ============================================================
// Legacy parser
// ============================================================

/// Heuristic decisions taken while parsing a legacy id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefNote {
    /// No `L<n>` or small bare integer found; level defaulted to 1
    LevelDefaulted,
    /// Level came from a bare integer, not an `L<n>` token
    BareLevel,
    /// No level before the dungeon number; any numeric segment was taken
    NumberWithoutLevel,
    /// Guild fell back to the first segment
    GuildFromFirstSegment,
    /// Short `guild-number-level` form
    ShortForm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyRef {
    pub guild: String,
    pub dungeon_number: u64,
    pub level: u32,
    pub notes: Vec<RefNote>,
}

impl LegacyRef {
    pub fn is_ambiguous(&self) -> bool {
        !self.notes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LegacyRefError {
    #[error("reference id '{0}' has fewer than 3 segments")]
    TooShort(String),
    #[error("could not find a guild and dungeon number in '{0}'")]
    Unresolved(String),
    #[error("reference id '{0}' names level 0; levels start at 1")]
    ZeroLevel(String),
}

fn number(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn level_token(part: &str) -> Option<u32> {
    part.strip_prefix('L')
        .and_then(number)
        .and_then(|n| u32::try_from(n).ok())
}

fn bare_level(part: &str) -> Option<u32> {
    number(part)
        .filter(|&n| n > 0 && n < u64::from(LEGACY_MAX_BARE_LEVEL))
        .map(|n| n as u32)
}

/// Parse a legacy hyphenated reference id.
///
/// With four or more segments the last two (timestamp, suffix) are skipped and
/// the level is searched right-to-left, then the dungeon number before it.
/// Everything before the dungeon number is the guild.
pub fn parse_legacy_ref(id: &str) -> Result<LegacyRef, LegacyRefError> {
    let parts: Vec<&str> = id.split('-').collect();
    if parts.len() < 3 {
        return Err(LegacyRefError::TooShort(id.to_string()));
    }

    let mut notes = Vec::new();
    let mut level = DEFAULT_LEVEL;
    let mut dungeon_number = 0u64;
    let guild;

    if parts.len() >= 4 {
        let last_candidate = parts.len() - 3;

        let mut level_index = None;
        for i in (0..=last_candidate).rev() {
            if let Some(l) = level_token(parts[i]) {
                level_index = Some(i);
                level = l;
                break;
            }
            if let Some(l) = bare_level(parts[i]) {
                level_index = Some(i);
                level = l;
                notes.push(RefNote::BareLevel);
                break;
            }
        }
        if level_index.is_none() {
            notes.push(RefNote::LevelDefaulted);
        }

        let search_end = match level_index {
            Some(li) if li > 0 => li,
            _ => {
                notes.push(RefNote::NumberWithoutLevel);
                last_candidate + 1
            }
        };
        let mut number_index = None;
        for i in (0..search_end).rev() {
            if let Some(n) = number(parts[i]) {
                number_index = Some(i);
                dungeon_number = n;
                break;
            }
        }

        match number_index {
            Some(ni) if ni > 0 => guild = parts[..ni].join("-"),
            _ => {
                notes.push(RefNote::GuildFromFirstSegment);
                guild = parts[0].to_string();
                if let Some(n) = parts[1..parts.len() - 2].iter().find_map(|p| number(p)) {
                    dungeon_number = n;
                }
            }
        }
    } else {
        notes.push(RefNote::ShortForm);
        guild = parts[0].to_string();
        if let Some(n) = number(parts[1]) {
            dungeon_number = n;
        }
        let level_part = parts[2];
        if level_part.starts_with('L') {
            level = level_token(level_part).unwrap_or(DEFAULT_LEVEL);
        } else if let Some(n) = number(level_part).and_then(|n| u32::try_from(n).ok()) {
            level = n;
        }
    }

    if guild.is_empty() || dungeon_number == 0 {
        return Err(LegacyRefError::Unresolved(id.to_string()));
    }
    if level == 0 {
        return Err(LegacyRefError::ZeroLevel(id.to_string()));
    }
    if !notes.is_empty() {
        tracing::warn!(id, ?notes, "legacy reference id parsed heuristically");
    }
    Ok(LegacyRef {
        guild,
        dungeon_number,
        level,
        notes,
    })
}

// ============================================================
// Structured replacement
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DungeonRefError {
    #[error("missing ':' before the guild name")]
    MissingSeparator,
    #[error("guild must not be empty")]
    EmptyGuild,
    #[error("expected 4 '.'-separated fields before the guild, found {0}")]
    FieldCount(usize),
    #[error("{field} '{value}' is not a valid number")]
    Number { field: &'static str, value: String },
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("suffix must be non-empty ASCII alphanumeric, got '{0}'")]
    Suffix(String),
}

/// Unambiguous dungeon reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DungeonRef {
    pub guild: String,
    pub dungeon_number: u64,
    pub level: u32,
    pub timestamp_ms: u64,
    pub suffix: String,
}

const SUFFIX_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

impl DungeonRef {
    /// Build a reference, deriving the suffix from `entropy`
    pub fn issue(
        guild: impl Into<String>,
        dungeon_number: u64,
        level: u32,
        created_at: DateTime<Utc>,
        entropy: u64,
    ) -> Result<Self, DungeonRefError> {
        let mut n = entropy;
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let c = SUFFIX_ALPHABET[(n % 36) as usize] as char;
                n /= 36;
                c
            })
            .collect();
        let r = Self {
            guild: guild.into(),
            dungeon_number,
            level,
            timestamp_ms: u64::try_from(created_at.timestamp_millis()).unwrap_or(0),
            suffix,
        };
        r.check()?;
        Ok(r)
    }

    fn check(&self) -> Result<(), DungeonRefError> {
        if self.guild.is_empty() {
            return Err(DungeonRefError::EmptyGuild);
        }
        if self.dungeon_number == 0 {
            return Err(DungeonRefError::Zero("dungeon number"));
        }
        if self.level == 0 {
            return Err(DungeonRefError::Zero("level"));
        }
        if self.suffix.is_empty() || !self.suffix.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(DungeonRefError::Suffix(self.suffix.clone()));
        }
        Ok(())
    }

    /// The old hyphenated form, for systems that still expect it
    pub fn to_legacy_string(&self) -> String {
        format!(
            "{}-{}-L{}-{}-{}",
            self.guild, self.dungeon_number, self.level, self.timestamp_ms, self.suffix
        )
    }
}

impl fmt::Display for DungeonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}:{}",
            self.dungeon_number, self.level, self.timestamp_ms, self.suffix, self.guild
        )
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, DungeonRefError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DungeonRefError::Number {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| DungeonRefError::Number {
        field,
        value: value.to_string(),
    })
}

impl FromStr for DungeonRef {
    type Err = DungeonRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, guild) = s.split_once(':').ok_or(DungeonRefError::MissingSeparator)?;
        let fields: Vec<&str> = head.split('.').collect();
        let [dungeon_number, level, timestamp, suffix] = fields[..] else {
            return Err(DungeonRefError::FieldCount(fields.len()));
        };
        let r = Self {
            guild: guild.to_string(),
            dungeon_number: parse_field("dungeon number", dungeon_number)?,
            level: parse_field("level", level)?,
            timestamp_ms: parse_field("timestamp", timestamp)?,
            suffix: suffix.to_string(),
        };
        r.check()?;
        Ok(r)
    }
}
