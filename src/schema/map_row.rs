//! Persisted editor map shape.
//!
//! Tiles are stored as raw gameplay ids so a row written by a newer editor
//! with tile ids this crate does not know still loads; resolution happens on
//! read through the semantics table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::{MapGrid, Vec2};
use crate::tiles::{self, FallbackPolicy, MapTile, TileProperties, TileSemantics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureKind {
    Sprite,
}

/// A sprite placed on one cell, optionally overriding that cell's properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTexture {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: TextureKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_map: Option<String>,
    pub grid_x: i32,
    pub grid_y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<TileProperties>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRow {
    pub id: String,
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_textures: Option<Vec<CustomTexture>>,
    pub created_at: DateTime<Utc>,
    /// Tile table the ids were written against; rows saved before the field
    /// existed read as the first table
    #[serde(default = "first_table_version")]
    pub table_version: u32,
}

fn first_table_version() -> u32 {
    1
}

impl MapRow {
    pub fn from_grid(id: impl Into<String>, name: impl Into<String>, grid: &MapGrid) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width: grid.width,
            height: grid.height,
            tiles: grid
                .tiles
                .iter()
                .map(|row| row.iter().map(|t| t.id().to_string()).collect())
                .collect(),
            custom_textures: None,
            created_at: Utc::now(),
            table_version: tiles::TABLE_VERSION,
        }
    }

    /// Resolve stored ids. Unknown ids follow `policy` and are logged.
    pub fn to_grid(&self, policy: FallbackPolicy) -> MapGrid {
        if self.table_version > tiles::TABLE_VERSION {
            tracing::warn!(
                id = %self.id,
                row_version = self.table_version,
                table_version = tiles::TABLE_VERSION,
                "map row was written against a newer tile table"
            );
        }
        MapGrid {
            width: self.width,
            height: self.height,
            tiles: self
                .tiles
                .iter()
                .map(|row| row.iter().map(|id| MapTile::from_id_or(id, policy)).collect())
                .collect(),
        }
    }

    fn texture_at(&self, pos: Vec2) -> Option<&CustomTexture> {
        self.custom_textures
            .as_deref()?
            .iter()
            .rev()
            .find(|t| t.grid_x == pos.x && t.grid_y == pos.y)
    }

    /// Properties that govern `pos`.
    ///
    /// A custom texture carrying properties wins over the table; otherwise the
    /// stored id is looked up with the renderer's floor fallback. Positions off
    /// the map read as wall.
    pub fn properties_at(&self, pos: Vec2) -> &TileProperties {
        if let Some(props) = self.texture_at(pos).and_then(|t| t.properties.as_ref()) {
            return props;
        }
        if pos.x < 0 || pos.y < 0 {
            return MapTile::Wall.properties();
        }
        match self
            .tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
        {
            Some(id) => tiles::lookup(id, FallbackPolicy::Floor),
            None => MapTile::Wall.properties(),
        }
    }
}
