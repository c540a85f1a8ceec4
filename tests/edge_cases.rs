//! Edge case & boundary tests
//!
//! Behaviour at the edges of every public entry point:
//! - Smallest and largest accepted dimensions, and one past each
//! - Blank seeds, zero levels, out-of-range door chances
//! - Out-of-bounds reads (negative and huge coordinates)
//! - Empty and malformed boundary inputs (char maps, token grids, records)
//! - Reference ids that only parse heuristically
//! - Pinned random-walk layouts for fixed seeds

use serde_json::json;

use dungeon_core::config::{ConfigError, GeneratorConfig};
use dungeon_core::constants::{MAX_DIMENSION, MAX_WALK_STEPS_PER_CELL, MIN_DIMENSION};
use dungeon_core::generation::{self, random_walk, DungeonRequest, GenerationError, WalkParams};
use dungeon_core::legacy::{
    self, grid_from_char_map, parse_legacy_ref, tile_records_to_grid, DungeonRef, LegacyDungeon,
    LegacyRefError, RefNote, TileRecord,
};
use dungeon_core::navigation::{self, can_move_to_pos, check_playable, tile_at};
use dungeon_core::rng::Seed;
use dungeon_core::schema::{logical_defects, validate, validate_grid, LogicalDefect};
use dungeon_core::tiles::{MapTile, MovementRequirement, TileKind};
use dungeon_core::{TileGrid, Vec2};

// ============================================================
// 1. Dimensions
// ============================================================

#[test]
fn test_minimum_dimension_accepted() {
    let g = generation::generate(MIN_DIMENSION, MIN_DIMENSION, "tiny").unwrap();
    assert_eq!(g.walkable_count(), 1, "only the center can be carved");
    assert_eq!(g.tiles[1][1], TileKind::Floor);
}

#[test]
fn test_below_minimum_rejected() {
    for (w, h) in [(0, 10), (10, 0), (MIN_DIMENSION - 1, 10), (10, MIN_DIMENSION - 1)] {
        let err = generation::generate(w, h, "x").unwrap_err();
        assert!(
            matches!(err, GenerationError::Precondition(ref m) if m.contains("at least")),
            "{w}x{h} gave {err}"
        );
    }
}

#[test]
fn test_maximum_dimension_boundary() {
    assert!(generation::generate(MAX_DIMENSION + 1, 3, "x").is_err());
    let mut params = WalkParams::new(MAX_DIMENSION, 3);
    params.steps_per_cell = 1;
    let g = generation::generate_with(&params, &Seed::from("wide")).unwrap();
    assert_eq!(g.width, MAX_DIMENSION);
}

#[test]
fn test_thin_grids_stay_on_center_row() {
    let g = generation::generate(40, 3, "corridor").unwrap();
    for (pos, tile) in g.cells() {
        if *tile == TileKind::Floor {
            assert_eq!(pos.y, 1);
        }
    }
}

// ============================================================
// 2. Seeds and request fields
// ============================================================

#[test]
fn test_blank_seeds_rejected() {
    for seed in ["", " ", "\t\n"] {
        assert!(generation::generate(10, 10, seed).is_err(), "seed {seed:?}");
    }
    assert!(generation::generate(10, 10, 0u64).is_ok(), "zero is a real seed");
    assert!(generation::generate(10, 10, u64::MAX).is_ok());
}

#[test]
fn test_request_guards() {
    let mut req = DungeonRequest::new(25, 17, "x");
    req.ttl_seconds = 0;
    assert!(generation::generate_dungeon(&req).is_err());

    let mut req = DungeonRequest::new(25, 17, "x");
    req.door_chance = -0.01;
    assert!(generation::generate_dungeon(&req).is_err());

    let mut req = DungeonRequest::new(25, 17, "x");
    req.door_chance = 1.0;
    let d = generation::generate_dungeon(&req).unwrap();
    assert!(logical_defects(&d).is_empty(), "doors never replace the endpoints");
}

#[test]
fn test_walk_step_count_is_bounded() {
    let err = GeneratorConfig::from_json(r#"{"walk_steps_per_cell": 18446744073709551615}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "walk_steps_per_cell", .. }));

    // Requests built by hand skip config validation; generation still refuses
    for steps in [0, MAX_WALK_STEPS_PER_CELL + 1, usize::MAX] {
        let mut req = DungeonRequest::new(25, 17, "abc");
        req.steps_per_cell = steps;
        assert!(
            matches!(generation::generate_dungeon(&req), Err(GenerationError::Precondition(_))),
            "steps per cell {steps}"
        );
    }

    let mut params = WalkParams::new(MAX_DIMENSION, MAX_DIMENSION);
    params.steps_per_cell = MAX_WALK_STEPS_PER_CELL;
    assert_eq!(
        params.step_count().unwrap(),
        MAX_DIMENSION * MAX_DIMENSION * MAX_WALK_STEPS_PER_CELL
    );
}

// ============================================================
// 3. Navigation contract
// ============================================================

#[test]
fn test_out_of_bounds_reads_are_wall() {
    let g = generation::generate(10, 10, "oob").unwrap();
    for p in [
        Vec2::new(-1, 0),
        Vec2::new(0, -1),
        Vec2::new(10, 0),
        Vec2::new(0, 10),
        Vec2::new(i32::MIN, i32::MAX),
    ] {
        assert_eq!(tile_at(&g, p), TileKind::Wall, "{p:?}");
        let all = [
            MovementRequirement::Fly,
            MovementRequirement::Swim,
            MovementRequirement::Climb,
            MovementRequirement::Teleport,
        ];
        assert!(!can_move_to_pos(&g, p, &all));
    }
}

#[test]
fn test_empty_grid_is_unplayable() {
    let empty = TileGrid::filled(0, 0, TileKind::Wall);
    assert_eq!(navigation::first_walkable(&empty), None);
    let err = check_playable(&empty, 1).unwrap_err();
    assert_eq!((err.walkable, err.required), (0, 1));
    assert!(check_playable(&empty, 0).is_ok(), "zero threshold accepts anything");
}

#[test]
fn test_water_needs_more_than_abilities() {
    let mut g = TileGrid::filled(3, 3, TileKind::Floor);
    g.set(Vec2::new(1, 1), TileKind::Water);
    assert!(!can_move_to_pos(&g, Vec2::new(1, 1), &[]));
    assert!(!can_move_to_pos(&g, Vec2::new(1, 1), &[MovementRequirement::Fly]));
}

// ============================================================
// 4. Validator boundaries
// ============================================================

#[test]
fn test_width_minus_one_names_width() {
    let err = validate_grid(&json!({"width": -1, "height": 5, "tiles": []})).unwrap_err();
    assert!(err.names("width"), "issues: {:?}", err.issues());
}

#[test]
fn test_empty_and_scalar_documents() {
    assert!(validate(&json!({})).is_err());
    assert!(validate(&json!(null)).is_err());
    assert!(validate(&json!([])).is_err());
    let err = validate(&json!({})).unwrap_err();
    for field in ["id", "seed", "level", "createdAt", "ttlSeconds", "grid"] {
        assert!(err.names(field), "missing {field} not reported");
    }
}

#[test]
fn test_zero_sized_grid_rejected() {
    let err = validate_grid(&json!({"width": 0, "height": 0, "tiles": []})).unwrap_err();
    assert!(err.names("width"));
    assert!(err.names("height"));
}

// ============================================================
// 5. Legacy boundary inputs
// ============================================================

#[test]
fn test_blank_char_map_is_empty_grid() {
    for text in ["", "\n\n", "   \n  "] {
        let g = grid_from_char_map(text);
        assert_eq!((g.width, g.height), (0, 0), "{text:?}");
    }
}

#[test]
fn test_char_map_windows_line_endings() {
    let g = grid_from_char_map("#,#\r\n,^,\r\n#V#\r\n");
    assert_eq!((g.width, g.height), (3, 3));
    assert_eq!(g.tiles[1][1], MapTile::Entrance);
    assert_eq!(g.tiles[2][1], MapTile::Exit);
}

#[test]
fn test_records_far_outside_grid_are_skipped() {
    let records = vec![
        TileRecord { x: -1, y: 0, kind: "room".into(), walkable: None, description: None },
        TileRecord { x: i64::MAX, y: 0, kind: "room".into(), walkable: None, description: None },
        TileRecord { x: 1, y: 1, kind: "lava".into(), walkable: None, description: None },
        TileRecord { x: 0, y: 1, kind: "corridor".into(), walkable: None, description: None },
    ];
    let g = tile_records_to_grid(&records, 2, 2);
    assert_eq!(g.tiles[0], vec![MapTile::Wall, MapTile::Wall]);
    assert_eq!(g.tiles[1], vec![MapTile::Floor, MapTile::Wall]);
}

#[test]
fn test_empty_legacy_dungeon_fails_validation() {
    let d = LegacyDungeon {
        tokens: vec![],
        seed: "old".into(),
    }
    .into_dungeon("empty");
    let value = serde_json::to_value(&d).unwrap();
    assert!(validate(&value).is_err());
    assert!(logical_defects(&d)
        .iter()
        .any(|e| matches!(e, LogicalDefect::OutOfBounds { .. })));
}

#[test]
fn test_ragged_legacy_rows_reported() {
    let grid = legacy::grid_from_legacy(&[vec!["room", "room"], vec!["room"]]);
    let value = serde_json::to_value(&grid).unwrap();
    let err = validate_grid(&value).unwrap_err();
    assert!(err.names("tiles[1]"), "issues: {:?}", err.issues());
}

// ============================================================
// 6. Reference ids
// ============================================================

#[test]
fn test_reference_scenario() {
    let r = parse_legacy_ref("my-guild-7-L2-1700000000000-x1y2").unwrap();
    assert_eq!((r.guild.as_str(), r.dungeon_number, r.level), ("my-guild", 7, 2));
}

#[test]
fn test_reference_heuristics_are_recorded() {
    let r = parse_legacy_ref("guild-500-1700000000000-abc").unwrap();
    assert!(r.is_ambiguous());
    assert!(r.notes.contains(&RefNote::LevelDefaulted));
    assert_eq!((r.guild.as_str(), r.dungeon_number, r.level), ("guild", 500, 1));

    assert!(matches!(parse_legacy_ref("a-b"), Err(LegacyRefError::TooShort(_))));
    assert!(matches!(parse_legacy_ref(""), Err(LegacyRefError::TooShort(_))));

    let r = parse_legacy_ref("guild-4-L3").unwrap();
    assert!(r.notes.contains(&RefNote::ShortForm));
}

#[test]
fn test_structured_reference_rejects_legacy_form() {
    assert!("my-guild-7-L2-1700000000000-x1y2".parse::<DungeonRef>().is_err());
    assert!("".parse::<DungeonRef>().is_err());
    assert!("1.1.0.abc:".parse::<DungeonRef>().is_err(), "empty guild");
}

#[test]
fn test_reference_level_zero_rejected() {
    assert!(matches!(parse_legacy_ref("guild-4-0"), Err(LegacyRefError::ZeroLevel(_))));
    assert!(matches!(parse_legacy_ref("guild-4-L0"), Err(LegacyRefError::ZeroLevel(_))));
    assert!(matches!(
        parse_legacy_ref("guild-4-L0-1700000000000-abc"),
        Err(LegacyRefError::ZeroLevel(_))
    ));
}

// ============================================================
// 7. Pinned layouts
// ============================================================

fn compact_rows(grid: &TileGrid) -> Vec<String> {
    grid.tiles
        .iter()
        .map(|row| {
            row.iter()
                .map(|t| match t {
                    TileKind::Wall => '#',
                    TileKind::Floor => '.',
                    TileKind::Door => '+',
                    other => panic!("random walk never places {other:?}"),
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_random_walk_layout_abc() {
    let g = generation::generate(25, 17, "abc").unwrap();
    let expected = [
        "#########################",
        "#................##.....#",
        "#....................##.#",
        "#....................##.#",
        "#......#................#",
        "#.......................#",
        "#........#...........##.#",
        "#.......##..........###.#",
        "#..................###..#",
        "#..................###..#",
        "#......................##",
        "#................#..#####",
        "#.............#.....#####",
        "#............##.....#####",
        "#.............##..#######",
        "##...........############",
        "#########################",
    ];
    assert_eq!(compact_rows(&g), expected);
    assert_eq!(
        random_walk::endpoints(&g),
        Some((Vec2::new(1, 1), Vec2::new(12, 15)))
    );
}

#[test]
fn test_random_walk_layout_with_doors() {
    let g = generation::generate(25, 17, 9u64).unwrap();
    let expected = [
        "#########################",
        "##........#+............#",
        "###.....................#",
        "#.......................#",
        "#.......................#",
        "##..##..................#",
        "#####...................#",
        "####...#......#.........#",
        "##...######.............#",
        "##.....####.............#",
        "###...###.+#............#",
        "#......##..............##",
        "#.....................###",
        "#.#...................###",
        "#....................####",
        "#..######...........#####",
        "#########################",
    ];
    assert_eq!(compact_rows(&g), expected);
}

#[test]
fn test_random_walk_layouts_for_text_seeds() {
    let seed_42 = compact_rows(&generation::generate(25, 17, "seed-42").unwrap());
    assert_eq!(seed_42[1], "#########...............#");
    assert_eq!(seed_42[4], "###..##...#.#...........#");
    assert_eq!(seed_42[13], "#.....................#.#");

    let hello = compact_rows(&generation::generate(25, 17, "hello").unwrap());
    assert_eq!(hello[1], "######............###.#.#");
    assert_eq!(hello[10], "####................#..##");
    assert_eq!(hello[15], "#####....##...........###");
}
