//! Rondel - command line match runner
//!
//! Drives AI-vs-AI matches of the radial-board dueling game, with
//! snapshot save and resume for reproducing positions.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rondel::config::GameConfig;
use rondel::game::{Game, SeatConfig, VerbosityLevel};
use std::path::PathBuf;

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "rondel")]
#[command(about = "Rondel - radial-board dueling game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one AI match and print the standings
    Run {
        /// Number of seats at the table
        #[arg(long, short = 's', default_value_t = 2)]
        seats: usize,

        /// Heroes to deal out, cycled over the seats (comma separated)
        #[arg(long, value_name = "NAMES")]
        heroes: Option<String>,

        /// Random seed for a reproducible match
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Play on the eight-arm board
        #[arg(long)]
        eight_arms: bool,

        /// Stop after this many seat turns even without a winner
        #[arg(long, default_value_t = 2000)]
        max_turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Write the final game snapshot to this file
        #[arg(long, value_name = "FILE")]
        snapshot_output: Option<PathBuf>,

        /// Resume from a snapshot instead of dealing a fresh match
        #[arg(long, value_name = "SNAPSHOT_FILE")]
        start_from: Option<PathBuf>,
    },

    /// Run silent matches in a tight loop (use with cargo-flamegraph)
    Profile {
        /// Number of matches to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Base seed; match i plays with seed + i
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            seats,
            heroes,
            seed,
            eight_arms,
            max_turns,
            verbosity,
            snapshot_output,
            start_from,
        } => run_match(
            seats,
            heroes,
            seed,
            eight_arms,
            max_turns,
            verbosity.into(),
            snapshot_output,
            start_from,
        ),
        Commands::Profile { games, seed } => run_profile(games, seed),
    }
}

/// Parse a hero list like "Warlord,Trickster" or "Warlord Trickster"
fn parse_heroes(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn build_roster(config: &GameConfig, seats: usize, heroes: Option<&str>) -> Result<Vec<Option<SeatConfig>>> {
    let pool: Vec<String> = match heroes {
        Some(list) => parse_heroes(list),
        None => config.heroes().into_iter().map(|h| h.name).collect(),
    };
    if pool.is_empty() {
        bail!("at least one hero name is required");
    }

    Ok((0..seats)
        .map(|i| {
            let hero = pool[i % pool.len()].clone();
            Some(SeatConfig::new(format!("seat-{i}"), format!("Player {}", i + 1), hero).ai())
        })
        .collect())
}

#[allow(clippy::too_many_arguments)] // CLI parameters naturally map to function args
fn run_match(
    seats: usize,
    heroes: Option<String>,
    seed: u64,
    eight_arms: bool,
    max_turns: u32,
    verbosity: VerbosityLevel,
    snapshot_output: Option<PathBuf>,
    start_from: Option<PathBuf>,
) -> Result<()> {
    let config = if eight_arms {
        GameConfig::eight_arms()
    } else {
        GameConfig::standard()
    };

    let mut game = if let Some(snapshot_file) = start_from {
        println!("Loading game from snapshot: {}", snapshot_file.display());
        let contents = std::fs::read_to_string(&snapshot_file)
            .with_context(|| format!("reading {}", snapshot_file.display()))?;
        Game::restore(&contents).context("parsing snapshot")?
    } else {
        let roster = build_roster(&config, seats, heroes.as_deref())?;
        Game::new(&config, &roster, seed).context("dealing the match")?
    };
    game.logger.set_verbosity(verbosity);

    if verbosity >= VerbosityLevel::Minimal {
        println!("=== Rondel ===");
        for player in game.eligible_seats() {
            println!("  {} plays {}", player.name, player.hero);
        }
        println!("  seed {seed}, {} arms\n", game.board.arm_count());
    }

    while !game.over && game.turn_number < max_turns {
        if !game.current_player()?.is_ai {
            println!("seat {} is waiting on a human; stopping", game.current);
            break;
        }
        game.step_ai_turn()?;
    }

    if verbosity >= VerbosityLevel::Minimal {
        println!("\n=== Standings after {} turns ===", game.turn_number);
        let mut ranked: Vec<_> = game
            .players
            .iter()
            .flatten()
            .filter_map(|p| p.rank.map(|rank| (rank, p)))
            .collect();
        ranked.sort_unstable_by_key(|(rank, _)| *rank);
        for (rank, player) in &ranked {
            println!("  {rank}. {} ({})", player.name, player.hero);
        }
        if ranked.is_empty() {
            println!("  no seat finished");
        }
    }

    if let Some(path) = snapshot_output {
        let json = game.snapshot().context("serializing game state")?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Snapshot saved to {}", path.display());
    }

    Ok(())
}

fn run_profile(games: usize, seed: u64) -> Result<()> {
    println!("Running {games} matches from seed {seed}");

    let config = GameConfig::standard();
    for i in 0..games {
        let roster = build_roster(&config, 2, None)?;
        let mut game = Game::new(&config, &roster, seed + i as u64)?;
        game.logger.set_verbosity(VerbosityLevel::Silent);

        while !game.over && game.turn_number < 10_000 {
            game.step_ai_turn()?;
        }

        if (i + 1) % 100 == 0 {
            println!("Completed {} matches", i + 1);
        }
    }

    println!("Done");
    Ok(())
}
