//! Performance benchmarks for the rondel rules engine
//!
//! Measures full AI-vs-AI matches with Criterion in two modes:
//!
//! 1. **Fresh** - deal a new match for each iteration
//! 2. **Snapshot** - clone a pre-dealt match each iteration, isolating
//!    turn-machine cost from setup cost
//!
//! A third group times pathfinding alone, since the greedy AI leans on
//! it for every candidate move.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rondel::board::pathfinding::shortest_path;
use rondel::board::Board;
use rondel::cards::MovementKind;
use rondel::config::GameConfig;
use rondel::game::{Game, SeatConfig, VerbosityLevel};
use rondel::Result;
use std::time::Duration;

fn ai_roster(config: &GameConfig, seats: usize) -> Vec<Option<SeatConfig>> {
    let heroes = config.heroes();
    (0..seats)
        .map(|i| {
            let hero = heroes[i % heroes.len()].name.clone();
            Some(SeatConfig::new(format!("seat-{i}"), format!("Bot {i}"), hero).ai())
        })
        .collect()
}

fn deal_match(config: &GameConfig, seats: usize, seed: u64) -> Result<Game> {
    let mut game = Game::new(config, &ai_roster(config, seats), seed)?;
    game.logger.set_verbosity(VerbosityLevel::Silent);
    Ok(game)
}

/// Play a match to its end and return the number of seat turns
fn run_to_completion(game: &mut Game) -> Result<u32> {
    while !game.over && game.turn_number < 10_000 {
        game.step_ai_turn()?;
    }
    Ok(game.turn_number)
}

/// Fresh mode: setup plus play, new match every iteration
fn bench_match_fresh(c: &mut Criterion) {
    let config = GameConfig::standard();

    let mut group = c.benchmark_group("match");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(15));

    let seed = 42u64;

    // One warmup match so the turn count shows up in the log.
    let mut warmup = deal_match(&config, 2, seed).expect("deal failed");
    let turns = run_to_completion(&mut warmup).expect("match failed");
    println!("\nWarmup match (seed {seed}): {turns} turns");

    for seats in [2usize, 4] {
        group.bench_with_input(BenchmarkId::new("fresh", seats), &seats, |b, &seats| {
            b.iter(|| {
                let mut game =
                    deal_match(&config, seats, black_box(seed)).expect("deal failed");
                run_to_completion(&mut game).expect("match failed")
            });
        });
    }

    group.finish();
}

/// Snapshot mode: clone a dealt match, timing only the turns
fn bench_match_snapshot(c: &mut Criterion) {
    let config = GameConfig::standard();

    let mut group = c.benchmark_group("match");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(15));

    let seed = 42u64;
    let initial = deal_match(&config, 2, seed).expect("deal failed");

    group.bench_function(BenchmarkId::new("snapshot", seed), |b| {
        b.iter(|| {
            let mut game = initial.clone();
            run_to_completion(&mut game).expect("match failed")
        });
    });

    group.finish();
}

/// Rim-to-rim A* on both standard boards
fn bench_pathfinding(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathfinding");

    let walk = [MovementKind::Line, MovementKind::Diagonal];
    for (label, config) in [
        ("four_arms", GameConfig::standard()),
        ("eight_arms", GameConfig::eight_arms()),
    ] {
        let board = Board::new(&config.board).expect("board build failed");
        let start = config.board.start_squares[0];
        let goal = config.board.start_squares[1];

        group.bench_function(BenchmarkId::new("rim_to_rim", label), |b| {
            b.iter(|| {
                shortest_path(&board, black_box(start), black_box(goal), &walk)
                    .expect("start squares must be connected")
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_match_fresh,
    bench_match_snapshot,
    bench_pathfinding
);
criterion_main!(benches);
