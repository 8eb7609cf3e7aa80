//! cavegen: generate roguelike levels from the command line
//!
//! Builds levels with the built-in catalog (or one loaded from JSON), prints
//! them as ASCII maps or JSON, and can carry a world's artifact ledger and
//! players between runs through a save file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use cg_core::catalog::{BuilderRegistry, Catalog, CatalogError, RawCatalog};
use cg_core::dungeon::{
    DungeonFlags, GeneratedLevel, GenerationError, LevelContext, LevelGenerator, LevelRequest,
    PostGenReport,
};
use cg_core::player::{Player, PlayerId, Quest};
use cg_core::world::{ConfigError, GenConfig, World, WorldPos};
use cg_save::{SaveError, SaveFormat, load_world, save_world};

/// Level generator for a shared roguelike world
#[derive(Parser, Debug)]
#[command(name = "cavegen")]
#[command(author, version, about = "Generate roguelike levels on demand", long_about = None)]
struct Cli {
    /// Log generation steps (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and print levels
    Generate(GenerateArgs),
    /// Print the built-in catalog as JSON
    Catalog {
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Dungeon depth; 0 is the surface
    #[arg(short = 'd', long, default_value_t = 1)]
    depth: i32,

    /// Wilderness column x
    #[arg(short = 'x', long, default_value_t = 0, allow_hyphen_values = true)]
    x: i16,

    /// Wilderness column y
    #[arg(short = 'y', long, default_value_t = 0, allow_hyphen_values = true)]
    y: i16,

    /// World RNG seed
    #[arg(short = 's', long, default_value_t = 0)]
    seed: u64,

    /// Number of levels to generate in a row
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Generate for a player of this name
    #[arg(short = 'u', long = "player")]
    player: Option<String>,

    /// Give the player a quest against this monster race
    #[arg(long, requires = "player")]
    quest: Option<String>,

    /// The player is diving and skips fixed encounters
    #[arg(long, requires = "player")]
    dive: bool,

    /// Generation config (`.json` or `key = value` lines)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog JSON to use instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Build with this cave profile instead of selecting one
    #[arg(long)]
    profile: Option<String>,

    /// Kind of surface level at depth 0
    #[arg(long, value_enum, default_value_t = Surface::Wilderness)]
    surface: Surface,

    /// The dungeon favours labyrinths
    #[arg(long)]
    maze: bool,

    /// The dungeon has caverns
    #[arg(long)]
    cavern: bool,

    /// The dungeon has arenas
    #[arg(long)]
    arena: bool,

    /// A quest is fought on this level
    #[arg(long)]
    quest_level: bool,

    /// Load the world from this save file, and write it back afterwards
    #[arg(long)]
    world: Option<PathBuf>,

    /// Print JSON instead of maps
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
enum Surface {
    Town,
    MangTown,
    Wilderness,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("save: {0}")]
    Save(#[from] SaveError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no monster race named {0}")]
    UnknownRace(String),
}

/// Printed form of one generated level
#[derive(Debug, Serialize)]
struct LevelSummary<'a> {
    profile: &'a str,
    wpos: String,
    attempts: usize,
    feeling: u8,
    obj_feeling: u8,
    mon_feeling: u8,
    monsters: usize,
    objects: usize,
    report: &'a PostGenReport,
    map: Vec<String>,
}

const PLAYER_ID: PlayerId = PlayerId(1);

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(&args),
        Command::Catalog { compact } => print_catalog(compact),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("cavegen: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_catalog(compact: bool) -> Result<(), CliError> {
    let raw = cg_data::raw_catalog();
    let text = if compact {
        serde_json::to_string(&raw)?
    } else {
        serde_json::to_string_pretty(&raw)?
    };
    println!("{}", text);
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    let Some(path) = path else {
        return Ok(cg_data::default_catalog()?);
    };
    let text = std::fs::read_to_string(path)?;
    let raw = RawCatalog::from_json(&text)?;
    Ok(Catalog::load(raw, &BuilderRegistry::with_defaults())?)
}

fn level_context(args: &GenerateArgs) -> LevelContext {
    let mut context = match args.surface {
        Surface::Town => LevelContext::town(true),
        Surface::MangTown => LevelContext::town(false),
        Surface::Wilderness => LevelContext::default(),
    };
    context.dungeon.set(DungeonFlags::MAZE, args.maze);
    context.dungeon.set(DungeonFlags::CAVERN, args.cavern);
    context.dungeon.set(DungeonFlags::ARENA, args.arena);
    context.quest_level = args.quest_level;
    context
}

fn setup_player(args: &GenerateArgs, world: &mut World, catalog: &Catalog) -> Result<(), CliError> {
    let Some(name) = &args.player else {
        return Ok(());
    };
    let mut player = world
        .player(PLAYER_ID)
        .cloned()
        .unwrap_or_else(|| Player::new(PLAYER_ID, name.as_str()));
    player.force_descend = args.dive;
    player.max_depth = player.max_depth.max(args.depth);

    if let Some(race_name) = &args.quest {
        let race = catalog
            .race_by_name(race_name)
            .ok_or_else(|| CliError::UnknownRace(race_name.clone()))?;
        player.quest = Some(Quest::new(race, 1));
    }
    world.add_player(player);
    Ok(())
}

fn run_generate(args: &GenerateArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => GenConfig::load_from_file(path)?,
        None => GenConfig::default(),
    };
    let catalog = Arc::new(load_catalog(args.catalog.as_deref())?);
    let generator = LevelGenerator::new(Arc::clone(&catalog), config);

    let mut world = World::new(args.seed);
    if let Some(path) = &args.world
        && path.exists()
    {
        load_world(path, &mut world)?;
        tracing::info!(path = %path.display(), turn = world.turn, "world loaded");
    }
    setup_player(args, &mut world, &catalog)?;

    let mut request = LevelRequest::new(WorldPos::new(args.x, args.y, args.depth))
        .with_context(level_context(args));
    if args.player.is_some() {
        request = request.for_player(PLAYER_ID);
    }
    if let Some(profile) = &args.profile {
        request = request.with_profile(profile.as_str());
    }
    tracing::debug!(surface = %args.surface, wpos = %request.wpos, "generating");

    for _ in 0..args.count {
        let mut level = generator.generate(&mut world, &request)?;
        print_level(&level, &catalog, args.json)?;
        // Printed levels are not kept, so their artifacts go back to the pool
        let wiped = generator.wipe(&mut world, &mut level.chunk);
        tracing::debug!(preserved = wiped.preserved, retired = wiped.retired, "level wiped");
        world.advance(1);
    }

    if let Some(path) = &args.world {
        let format = if path.extension().is_some_and(|e| e == "gz") {
            SaveFormat::Gzip
        } else {
            SaveFormat::Pretty
        };
        save_world(&world, path, format)?;
    }
    Ok(())
}

fn print_level(level: &GeneratedLevel, catalog: &Catalog, json: bool) -> Result<(), CliError> {
    let chunk = &level.chunk;
    let map = chunk.render(|race| catalog.race(race).map_or('?', |r| r.symbol));

    if json {
        let summary = LevelSummary {
            profile: &chunk.profile,
            wpos: chunk.wpos.to_string(),
            attempts: level.attempts,
            feeling: chunk.feeling,
            obj_feeling: chunk.obj_feeling,
            mon_feeling: chunk.mon_feeling,
            monsters: chunk.monster_count(),
            objects: chunk.objects.len(),
            report: &level.report,
            map: map.lines().map(str::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "profile: {}  wpos: {}  attempts: {}",
        chunk.profile, chunk.wpos, level.attempts
    );
    println!(
        "feeling: {} (objects {}, monsters {})",
        chunk.feeling, chunk.obj_feeling, chunk.mon_feeling
    );
    println!(
        "monsters: {}  objects: {}  encounters placed: {}  skipped: {}",
        chunk.monster_count(),
        chunk.objects.len(),
        level.report.placed.len(),
        level.report.skipped.len()
    );
    print!("{}", map);
    Ok(())
}
