//! Dungeon validator.
//!
//! Walks an untrusted `serde_json::Value`, type-checks every field and collects
//! every problem with a dotted path (`grid.width`, `features[2].type`) instead
//! of stopping at the first one. Nothing is coerced: `"5"` is not an integer and
//! `5.5` is not a level. Unknown keys are ignored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use super::{
    Dungeon, Entity, EntityKind, Feature, FeatureType, JsonObject, Rect, Room,
};
use crate::grid::{TileGrid, Vec2};
use crate::tiles::TileKind;

/// One field-level problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path of the offending field; empty for the document root
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed JSON: {0}")]
    Syntax(String),
    #[error("{} invalid field(s): {}", .0.len(), summarize(.0))]
    Fields(Vec<FieldIssue>),
}

impl ValidationError {
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ValidationError::Syntax(_) => &[],
            ValidationError::Fields(issues) => issues,
        }
    }

    /// Does any issue point at exactly `path`?
    pub fn names(&self, path: &str) -> bool {
        self.issues().iter().any(|i| i.path == path)
    }
}

/// Validate a candidate dungeon document
pub fn validate(value: &Value) -> Result<Dungeon, ValidationError> {
    let mut v = Validator::default();
    let dungeon = v.dungeon(value, "");
    v.finish(dungeon)
}

/// Parse then validate
pub fn validate_str(json: &str) -> Result<Dungeon, ValidationError> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| ValidationError::Syntax(e.to_string()))?;
    validate(&value)
}

/// Validate the grid sub-schema on its own
pub fn validate_grid(value: &Value) -> Result<TileGrid, ValidationError> {
    let mut v = Validator::default();
    let grid = v.grid(value, "");
    v.finish(grid)
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn index(parent: &str, i: usize) -> String {
    format!("{parent}[{i}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Default)]
struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    fn finish<T>(self, parsed: Option<T>) -> Result<T, ValidationError> {
        match parsed {
            Some(value) if self.issues.is_empty() => Ok(value),
            _ => {
                tracing::debug!(issues = self.issues.len(), "validation rejected document");
                Err(ValidationError::Fields(self.issues))
            }
        }
    }

    fn issue(&mut self, path: &str, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn expected(&mut self, path: &str, what: &str, got: &Value) {
        self.issue(path, format!("expected {what}, found {}", type_name(got)));
    }

    // ---- primitives ----

    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a JsonObject> {
        let obj = value.as_object();
        if obj.is_none() {
            self.expected(path, "object", value);
        }
        obj
    }

    fn array<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
        let arr = value.as_array();
        if arr.is_none() {
            self.expected(path, "array", value);
        }
        arr
    }

    fn required<'a>(&mut self, obj: &'a JsonObject, key: &str, parent: &str) -> Option<&'a Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.issue(&join(parent, key), "is required");
        }
        value
    }

    fn string(&mut self, value: &Value, path: &str) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.expected(path, "string", other);
                None
            }
        }
    }

    fn boolean(&mut self, value: &Value, path: &str) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                self.expected(path, "boolean", other);
                None
            }
        }
    }

    /// Whole numbers only. `3.0` counts, `3.5` and `"3"` do not.
    fn integer(&mut self, value: &Value, path: &str) -> Option<i64> {
        let Value::Number(n) = value else {
            self.expected(path, "integer", value);
            return None;
        };
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                Some(f as i64)
            }
            _ => {
                self.issue(path, format!("expected integer, found {n}"));
                None
            }
        }
    }

    fn integer_at_least(&mut self, value: &Value, path: &str, min: i64) -> Option<i64> {
        let i = self.integer(value, path)?;
        if i < min {
            self.issue(path, format!("must be at least {min}, found {i}"));
            return None;
        }
        Some(i)
    }

    fn i32_field(&mut self, value: &Value, path: &str) -> Option<i32> {
        let i = self.integer(value, path)?;
        match i32::try_from(i) {
            Ok(v) => Some(v),
            Err(_) => {
                self.issue(path, format!("{i} is out of range"));
                None
            }
        }
    }

    fn one_of<T: DeserializeOwned>(
        &mut self,
        value: &Value,
        path: &str,
        names: &[&str],
    ) -> Option<T> {
        let s = self.string(value, path)?;
        match serde_json::from_value(Value::String(s.clone())) {
            Ok(v) => Some(v),
            Err(_) => {
                self.issue(
                    path,
                    format!("unknown value '{s}', expected one of {}", names.join(", ")),
                );
                None
            }
        }
    }

    fn optional<T>(
        &mut self,
        obj: &JsonObject,
        key: &str,
        parent: &str,
        check: impl FnOnce(&mut Self, &Value, &str) -> Option<T>,
    ) -> Result<Option<T>, ()> {
        match obj.get(key) {
            None => Ok(None),
            Some(value) => check(self, value, &join(parent, key)).map(Some).ok_or(()),
        }
    }

    fn list<T>(
        &mut self,
        value: &Value,
        path: &str,
        mut item: impl FnMut(&mut Self, &Value, &str) -> Option<T>,
    ) -> Option<Vec<T>> {
        let arr = self.array(value, path)?;
        let mut out = Vec::with_capacity(arr.len());
        let mut ok = true;
        for (i, v) in arr.iter().enumerate() {
            match item(self, v, &index(path, i)) {
                Some(parsed) => out.push(parsed),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }

    fn field<T>(
        &mut self,
        obj: &JsonObject,
        key: &str,
        parent: &str,
        check: impl FnOnce(&mut Self, &Value, &str) -> Option<T>,
    ) -> Option<T> {
        let value = self.required(obj, key, parent)?;
        check(self, value, &join(parent, key))
    }

    // ---- schema pieces ----

    fn vec2(&mut self, value: &Value, path: &str) -> Option<Vec2> {
        let obj = self.object(value, path)?;
        let x = self.field(obj, "x", path, Self::i32_field);
        let y = self.field(obj, "y", path, Self::i32_field);
        Some(Vec2::new(x?, y?))
    }

    fn data(&mut self, value: &Value, path: &str) -> Option<JsonObject> {
        self.object(value, path).cloned()
    }

    fn rect(&mut self, value: &Value, path: &str) -> Option<Rect> {
        let obj = self.object(value, path)?;
        let x = self.field(obj, "x", path, Self::i32_field);
        let y = self.field(obj, "y", path, Self::i32_field);
        let w = self.field(obj, "w", path, Self::i32_field);
        let h = self.field(obj, "h", path, Self::i32_field);
        Some(Rect::new(x?, y?, w?, h?))
    }

    fn room(&mut self, value: &Value, path: &str) -> Option<Room> {
        let obj = self.object(value, path)?;
        let id = self.field(obj, "id", path, Self::string);
        let rect = self.field(obj, "rect", path, Self::rect);
        let tags = self.optional(obj, "tags", path, |v, value, p| v.list(value, p, Self::string));
        Some(Room {
            id: id?,
            rect: rect?,
            tags: tags.ok()?,
        })
    }

    fn feature(&mut self, value: &Value, path: &str) -> Option<Feature> {
        let obj = self.object(value, path)?;
        let id = self.field(obj, "id", path, Self::string);
        let kind = self.field(obj, "type", path, |v, value, p| {
            v.one_of::<FeatureType>(value, p, &FeatureType::NAMES)
        });
        let pos = self.field(obj, "pos", path, Self::vec2);
        let data = self.optional(obj, "data", path, Self::data);
        let hidden = self.optional(obj, "hidden", path, Self::boolean);
        Some(Feature {
            id: id?,
            kind: kind?,
            pos: pos?,
            data: data.ok()?,
            hidden: hidden.ok()?,
        })
    }

    fn level(&mut self, value: &Value, path: &str) -> Option<u32> {
        let i = self.integer_at_least(value, path, 1)?;
        match u32::try_from(i) {
            Ok(level) => Some(level),
            Err(_) => {
                self.issue(path, format!("{i} is out of range"));
                None
            }
        }
    }

    fn entity(&mut self, value: &Value, path: &str) -> Option<Entity> {
        let obj = self.object(value, path)?;
        let id = self.field(obj, "id", path, Self::string);
        let kind = self.field(obj, "kind", path, |v, value, p| {
            v.one_of::<EntityKind>(value, p, &EntityKind::NAMES)
        });
        let name = self.field(obj, "name", path, Self::string);
        let pos = self.field(obj, "pos", path, Self::vec2);
        let level = self.field(obj, "level", path, Self::level);
        let hostile = self.optional(obj, "hostile", path, Self::boolean);
        let ai = self.optional(obj, "ai", path, Self::string);
        let data = self.optional(obj, "data", path, Self::data);
        Some(Entity {
            id: id?,
            kind: kind?,
            name: name?,
            pos: pos?,
            level: level?,
            hostile: hostile.ok()?,
            ai: ai.ok()?,
            data: data.ok()?,
        })
    }

    fn dimension(&mut self, value: &Value, path: &str) -> Option<usize> {
        let i = self.integer(value, path)?;
        if i <= 0 {
            self.issue(path, format!("must be a positive integer, found {i}"));
            return None;
        }
        usize::try_from(i).ok()
    }

    fn tile(&mut self, value: &Value, path: &str) -> Option<TileKind> {
        const NAMES: [&str; 8] = [
            "wall",
            "floor",
            "door",
            "stairs_up",
            "stairs_down",
            "water",
            "lava",
            "void",
        ];
        self.one_of::<TileKind>(value, path, &NAMES)
    }

    fn grid(&mut self, value: &Value, path: &str) -> Option<TileGrid> {
        let obj = self.object(value, path)?;
        let width = self.field(obj, "width", path, Self::dimension);
        let height = self.field(obj, "height", path, Self::dimension);
        let tiles_path = join(path, "tiles");
        let tiles = self.field(obj, "tiles", path, |v, value, p| {
            v.list(value, p, |v, row, rp| v.list(row, rp, Self::tile))
        });

        let (width, height, tiles) = (width?, height?, tiles?);
        let mut shape_ok = true;
        if tiles.len() != height {
            self.issue(
                &tiles_path,
                format!("expected {height} rows, found {}", tiles.len()),
            );
            shape_ok = false;
        }
        for (y, row) in tiles.iter().enumerate() {
            if row.len() != width {
                self.issue(
                    &index(&tiles_path, y),
                    format!("expected {width} tiles, found {}", row.len()),
                );
                shape_ok = false;
            }
        }
        shape_ok.then_some(TileGrid {
            width,
            height,
            tiles,
        })
    }

    fn timestamp(&mut self, value: &Value, path: &str) -> Option<DateTime<Utc>> {
        let s = self.string(value, path)?;
        match DateTime::parse_from_rfc3339(&s) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                self.issue(path, format!("'{s}' is not an ISO-8601 timestamp ({e})"));
                None
            }
        }
    }

    fn dungeon(&mut self, value: &Value, path: &str) -> Option<Dungeon> {
        let obj = self.object(value, path)?;
        let id = self.field(obj, "id", path, Self::string);
        let seed = self.field(obj, "seed", path, Self::string);
        let level = self.field(obj, "level", path, Self::level);
        let created_at = self.field(obj, "createdAt", path, Self::timestamp);
        let ttl_seconds = self.field(obj, "ttlSeconds", path, |v, value, p| {
            let i = v.integer(value, p)?;
            if i <= 0 {
                v.issue(p, format!("must be a positive integer, found {i}"));
                return None;
            }
            u64::try_from(i).ok()
        });
        let grid = self.field(obj, "grid", path, Self::grid);
        let rooms = self.field(obj, "rooms", path, |v, value, p| v.list(value, p, Self::room));
        let features = self.field(obj, "features", path, |v, value, p| {
            v.list(value, p, Self::feature)
        });
        let entities = self.field(obj, "entities", path, |v, value, p| {
            v.list(value, p, Self::entity)
        });
        let entrances = self.field(obj, "entrances", path, |v, value, p| {
            v.list(value, p, Self::vec2)
        });
        let exits = self.field(obj, "exits", path, |v, value, p| v.list(value, p, Self::vec2));

        Some(Dungeon {
            id: id?,
            seed: seed?,
            level: level?,
            created_at: created_at?,
            ttl_seconds: ttl_seconds?,
            grid: grid?,
            rooms: rooms?,
            features: features?,
            entities: entities?,
            entrances: entrances?,
            exits: exits?,
        })
    }
}
