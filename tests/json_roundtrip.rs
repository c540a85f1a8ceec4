//! Integration tests: JSON round-trip through files.
//!
//! Mirrors how dungeons travel between the generator and its consumers:
//!   1. Generate or convert a dungeon
//!   2. Write it as pretty JSON to disk
//!   3. Read it back through the strict validator
//!   4. Check the consumer views (client payload, map row) agree with the source

use std::fs;

use chrono::{TimeZone, Utc};

use dungeon_core::config::GeneratorConfig;
use dungeon_core::generation::{self, Algorithm, DungeonRequest};
use dungeon_core::legacy::{
    grid_to_tile_records, tile_records_to_grid, DungeonParts, LegacyDungeon, TileRecord,
};
use dungeon_core::navigation;
use dungeon_core::samples;
use dungeon_core::schema::{self, ClientPayload, Dungeon, MapRow};
use dungeon_core::tiles::FallbackPolicy;

// ============================================================
// Helpers
// ============================================================

fn fixed_request(algorithm: Algorithm) -> DungeonRequest {
    let mut req = DungeonRequest::new(25, 17, "roundtrip");
    req.algorithm = algorithm;
    req.created_at = Some(Utc.with_ymd_and_hms(2025, 8, 11, 0, 0, 0).unwrap());
    req
}

fn write_and_reload(dungeon: &Dungeon) -> Dungeon {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dungeon.json");
    fs::write(&path, dungeon.to_pretty_json().unwrap()).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    schema::validate_str(&text)
        .unwrap_or_else(|e| panic!("artifact failed validation: {e}\n{text}"))
}

// ============================================================
// Generated dungeons
// ============================================================

#[test]
fn roundtrip_random_walk_artifact() {
    let d = generation::generate_dungeon(&fixed_request(Algorithm::RandomWalk)).unwrap();
    let back = write_and_reload(&d);
    assert_eq!(back, d);
    assert!(schema::logical_defects(&back).is_empty());
}

#[test]
fn roundtrip_rooms_artifact() {
    let d = generation::generate_dungeon(&fixed_request(Algorithm::RoomsAndCorridors)).unwrap();
    let back = write_and_reload(&d);
    assert_eq!(back.rooms.len(), 5);
    assert_eq!(back.features, d.features);
    assert_eq!(back, d);
}

#[test]
fn roundtrip_pretty_json_shape() {
    let d = generation::generate_dungeon(&fixed_request(Algorithm::RandomWalk)).unwrap();
    let json = d.to_pretty_json().unwrap();
    assert!(json.starts_with("{\n  \"id\""), "two-space indentation");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["createdAt"], "2025-08-11T00:00:00Z");
    assert_eq!(value["ttlSeconds"], 900);
    assert_eq!(value["grid"]["tiles"][0][0], "wall");
}

#[test]
fn roundtrip_same_request_same_document() {
    let a = generation::generate_dungeon(&fixed_request(Algorithm::RandomWalk)).unwrap();
    let b = generation::generate_dungeon(&fixed_request(Algorithm::RandomWalk)).unwrap();
    assert_eq!(a.to_pretty_json().unwrap(), b.to_pretty_json().unwrap());
}

#[test]
fn roundtrip_config_driven_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generator.json");
    fs::write(&path, r#"{"width": 30, "height": 12, "rng": "legacy_lcg", "level": 2}"#).unwrap();
    let config = GeneratorConfig::load(&path).unwrap();
    let d = generation::generate_dungeon(&config.to_request(99u64)).unwrap();
    assert_eq!((d.grid.width, d.grid.height, d.level), (30, 12, 2));
    let back = write_and_reload(&d);
    assert_eq!(back.grid, d.grid);
}

// ============================================================
// Consumer views
// ============================================================

#[test]
fn roundtrip_client_payload() {
    let d = generation::generate_dungeon(&fixed_request(Algorithm::RoomsAndCorridors)).unwrap();
    let payload = ClientPayload::from(&d);
    let json = serde_json::to_string(&payload).unwrap();
    let back: ClientPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(back.meta.id, d.id);
    assert_eq!(back.grid, d.grid);
    assert_eq!(back.features.len(), d.features.len());
}

#[test]
fn roundtrip_sample_map_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.json");
    let row = samples::sample_map_row();
    fs::write(&path, serde_json::to_string_pretty(&row).unwrap()).unwrap();
    let back: MapRow = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, row);
    let grid = back.to_grid(FallbackPolicy::Wall);
    assert_eq!(grid, samples::wizardry_floor_1());
    assert!(navigation::check_playable_default(&grid).is_ok());
}

// ============================================================
// Legacy formats
// ============================================================

#[test]
fn roundtrip_tile_records() {
    let layout = generation::generate_rooms_and_corridors(20, 15, 9);
    let records = grid_to_tile_records(&layout.grid);
    let json = serde_json::to_string(&records).unwrap();
    let back: Vec<TileRecord> = serde_json::from_str(&json).unwrap();
    let grid = tile_records_to_grid(&back, 20, 15);
    for (pos, tile) in layout.grid.cells() {
        use dungeon_core::tiles::TileSemantics;
        assert_eq!(grid.tile_or_solid(pos).is_walkable(), tile.is_walkable(), "{pos:?}");
    }
}

#[test]
fn roundtrip_legacy_token_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"{"seed": "old-seed", "tokens": [["room","wall","wall"],["path","path","room"]]}"#,
    )
    .unwrap();
    let input: LegacyDungeon = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let d = input.into_dungeon("legacy-7");
    assert!(schema::logical_defects(&d).is_empty());
    let back = write_and_reload(&d);
    assert_eq!(back.seed, "old-seed");
    assert_eq!((back.grid.width, back.grid.height), (3, 2));
}

#[test]
fn roundtrip_parts_keep_explicit_fields() {
    let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let grid = generation::generate(10, 8, "parts").unwrap();
    let d = dungeon_core::legacy::dungeon_from_parts(DungeonParts {
        id: "p".into(),
        seed: "parts".into(),
        level: 3,
        ttl_seconds: Some(60),
        created_at: Some(created),
        grid,
        entrance: None,
        exit: None,
    });
    let back = write_and_reload(&d);
    assert_eq!(back.created_at, created);
    assert_eq!(back.ttl_seconds, 60);
}
