//! Dungeon Procedural Core - command line
//!
//! Generates, validates and converts dungeon documents. JSON goes to stdout,
//! logs to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use dungeon_core::config::GeneratorConfig;
use dungeon_core::generation::{self, Algorithm, SurveySummary};
use dungeon_core::legacy::{self, DungeonParts, DungeonRef, LegacyDungeon};
use dungeon_core::logging;
use dungeon_core::navigation;
use dungeon_core::rng::Seed;
use dungeon_core::schema::{self, Dungeon};

#[derive(Parser, Debug)]
#[command(name = "dungeon-core")]
#[command(version, about = "Seeded dungeon generation and validation", long_about = None)]
struct Cli {
    /// Generator config (JSON); defaults when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dungeon and write it as pretty JSON
    Generate {
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        height: Option<usize>,
        /// Text or integer seed; defaults to the current time in milliseconds
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        level: Option<u32>,
        #[arg(long, value_enum)]
        algorithm: Option<AlgorithmArg>,
        #[arg(long, default_value = "out/dungeon.json")]
        out: PathBuf,
    },
    /// Validate a dungeon JSON file
    Validate { file: PathBuf },
    /// Convert a legacy token grid (JSON) or char map to a dungeon
    ConvertLegacy {
        file: PathBuf,
        /// Input is a legend char map instead of `{tokens, seed}` JSON
        #[arg(long)]
        char_map: bool,
        #[arg(long, default_value = "legacy")]
        id: String,
    },
    /// Parse a dungeon reference id, structured or legacy
    ParseRef { id: String },
    /// Generate many seeds in parallel and summarise playability
    Survey {
        #[arg(long, default_value_t = 100)]
        count: u64,
        /// First integer seed
        #[arg(long, default_value_t = 0)]
        start: u64,
        /// Print every row, not just the summary
        #[arg(long)]
        rows: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    RandomWalk,
    Rooms,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(a: AlgorithmArg) -> Self {
        match a {
            AlgorithmArg::RandomWalk => Algorithm::RandomWalk,
            AlgorithmArg::Rooms => Algorithm::RoomsAndCorridors,
        }
    }
}

fn parse_seed(raw: &str) -> Seed {
    match raw.parse::<u64>() {
        Ok(n) => Seed::Number(n),
        Err(_) => Seed::from(raw),
    }
}

fn write_pretty(path: &Path, dungeon: &Dungeon) -> Result<String> {
    let json = dungeon.to_pretty_json()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
    Ok(json)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = GeneratorConfig::load_or_default(cli.config.as_deref())
        .context("loading generator config")?;
    logging::init_tracing(&config.tracing.clone().with_verbosity(cli.verbose));

    match cli.command {
        Command::Generate {
            width,
            height,
            seed,
            level,
            algorithm,
            out,
        } => {
            config.width = width.or(config.width);
            config.height = height.or(config.height);
            config.level = level.unwrap_or(config.level);
            if let Some(a) = algorithm {
                config.algorithm = a.into();
            }
            config.validate()?;

            let seed = match seed {
                Some(s) => parse_seed(&s),
                None => Seed::Number(chrono::Utc::now().timestamp_millis().unsigned_abs()),
            };
            let dungeon = generation::generate_dungeon(&config.to_request(seed))?;
            let playable = navigation::check_playable(&dungeon.grid, config.min_walkable_tiles);
            if let Err(deficiency) = playable {
                tracing::warn!(%deficiency, "generated dungeon is below the playability threshold");
            }
            let json = write_pretty(&out, &dungeon)?;
            println!("{json}");
            tracing::info!(path = %out.display(), "dungeon written");
        }
        Command::Validate { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let dungeon = match schema::validate_str(&text) {
                Ok(d) => d,
                Err(e) => {
                    for issue in e.issues() {
                        eprintln!("  {issue}");
                    }
                    bail!("{} is not a valid dungeon: {e}", file.display());
                }
            };
            let defects = schema::logical_defects(&dungeon);
            for defect in &defects {
                tracing::warn!(%defect, "logical defect");
            }
            let analysis = navigation::analyze(&dungeon.grid);
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            tracing::info!(id = %dungeon.id, defects = defects.len(), "dungeon is valid");
        }
        Command::ConvertLegacy { file, char_map, id } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let dungeon = if char_map {
                let mut parts = DungeonParts::from_char_map(id, file.display().to_string(), &text);
                parts.level = config.level;
                parts.ttl_seconds = Some(config.ttl_seconds);
                legacy::dungeon_from_parts(parts)
            } else {
                let input: LegacyDungeon = serde_json::from_str(&text)
                    .with_context(|| format!("parsing {} as a legacy token grid", file.display()))?;
                input.into_dungeon(id)
            };

            // The document must hold up under the same validator uploads go through
            let value = serde_json::to_value(&dungeon)?;
            schema::validate(&value).context("converted dungeon failed validation")?;
            for defect in schema::logical_defects(&dungeon) {
                tracing::warn!(%defect, "converted dungeon has a logical defect");
            }
            println!("{}", dungeon.to_pretty_json()?);
        }
        Command::ParseRef { id } => {
            let json = match id.parse::<DungeonRef>() {
                Ok(r) => serde_json::to_string_pretty(&r)?,
                Err(structured) => {
                    tracing::debug!(%structured, "not a structured reference, trying legacy form");
                    let r = legacy::parse_legacy_ref(&id)?;
                    if r.is_ambiguous() {
                        tracing::warn!(notes = ?r.notes, "legacy reference parsed heuristically");
                    }
                    serde_json::to_string_pretty(&r)?
                }
            };
            println!("{json}");
        }
        Command::Survey { count, start, rows } => {
            config.validate()?;
            let seeds: Vec<Seed> = (start..start.saturating_add(count)).map(Seed::from).collect();
            let results =
                generation::survey(&config.walk_params(), &seeds, config.min_walkable_tiles)?;
            if rows {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            let summary = SurveySummary::from_rows(&results);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
