//! Headless batch play.
//!
//! Plays many games from one scenario with no pacing and records a short
//! summary of each: turns played, how each side fared, and how many
//! commands were issued. Games can run in parallel on a rayon pool.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::board::{GameEvent, GameState, SideTally};
use crate::engine::{run_game, Finish, LoopConfig, SharedGame};
use crate::error::GameError;
use crate::scenario::{Scenario, ScenarioError};

#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("game {game_id} failed: {source}")]
    Game {
        game_id: usize,
        source: GameError,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("self-play worker thread panicked")]
    WorkerPanicked,
}

/// Configuration for a self-play batch.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Turn limit for each game.
    pub max_turns: u32,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
    pub scenario: Scenario,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            max_turns: crate::engine::DEFAULT_MAX_TURNS,
            threads: 4,
            seed: 0,
            quiet: false,
            scenario: Scenario::classic(),
        }
    }
}

/// Summary of one finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub turns_played: u32,
    pub finish: Finish,
    pub commands: usize,
    pub sides: [SideTally; 2],
}

fn seeded_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays a single game to its turn limit from a copy of `setup`.
pub fn play_game(
    setup: &GameState,
    max_turns: u32,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, GameError> {
    let shared = SharedGame::new(setup.clone());
    let config = LoopConfig {
        max_turns,
        pacing: Duration::ZERO,
    };
    let summary = run_game(&shared, &config, rng)?;
    let state = shared.into_state();
    let commands = state
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::CommandIssued { .. }))
        .count();

    Ok(GameRecord {
        game_id,
        turns_played: summary.turns_played,
        finish: summary.finish,
        commands,
        sides: summary.tallies,
    })
}

/// Runs a batch and collects every completed game, ordered by id.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| games.push(game))?;
    games.sort_by_key(|g| g.game_id);
    Ok(games)
}

/// Runs a batch, handing each game to `on_game` as it completes.
///
/// The first game error aborts the batch and is returned.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    let setup = config.scenario.build()?;
    run_batch(config, &setup, on_game)
}

fn run_batch<F>(config: &SelfPlayConfig, setup: &GameState, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_parallel(config, setup, on_game)
    } else {
        run_sequential(config, setup, on_game)
    }
}

fn play_one(
    config: &SelfPlayConfig,
    setup: &GameState,
    game_id: usize,
) -> Result<(GameRecord, Duration), SelfPlayError> {
    let mut rng = seeded_rng(config.seed, game_id);
    let started = Instant::now();
    match play_game(setup, config.max_turns, game_id, &mut rng) {
        Ok(game) => Ok((game, started.elapsed())),
        Err(source) => {
            warn!(game = game_id, "game aborted: {}", source);
            Err(SelfPlayError::Game { game_id, source })
        }
    }
}

fn report(config: &SelfPlayConfig, n: usize, game: &GameRecord, elapsed: Duration) {
    if config.quiet {
        return;
    }
    let [red, blue] = &game.sides;
    info!(
        "Game {}/{}: {} turns, {} evacuated {} lost {}, {} evacuated {} lost {} ({:.2}s)",
        n,
        config.num_games,
        game.turns_played,
        red.name,
        red.evacuated,
        red.destroyed,
        blue.name,
        blue.evacuated,
        blue.destroyed,
        elapsed.as_secs_f64(),
    );
}

fn run_sequential<F>(config: &SelfPlayConfig, setup: &GameState, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let (game, elapsed) = play_one(config, setup, i)?;
        report(config, i + 1, &game, elapsed);
        on_game(game);
    }
    Ok(())
}

/// Plays games on a rayon pool; a channel delivers finished games back to
/// the calling thread. The first failing game stops the pool from starting
/// new ones.
fn run_parallel<F>(config: &SelfPlayConfig, setup: &GameState, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|s| {
        let worker = s.spawn(|| {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .try_for_each_with(tx, |tx, i| {
                        let (game, elapsed) = play_one(config, setup, i)?;
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        report(config, n, &game, elapsed);
                        let _ = tx.send(game);
                        Ok(())
                    })
            })
        });

        for game in rx {
            on_game(game);
        }
        worker.join().map_err(|_| SelfPlayError::WorkerPanicked)?
    })
}

/// Writes game records as JSONL, one object per line.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Writes totals across a batch.
pub fn write_summary<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    let total = games.len();
    let per_game = |n: usize| n as f64 / total.max(1) as f64;

    writeln!(out, "=== Self-Play Summary ===")?;
    writeln!(out, "Games: {}", total)?;
    writeln!(
        out,
        "Avg turns/game: {:.1}",
        per_game(games.iter().map(|g| g.turns_played as usize).sum())
    )?;
    writeln!(
        out,
        "Avg commands/game: {:.1}",
        per_game(games.iter().map(|g| g.commands).sum())
    )?;
    for side in 0..2 {
        let name = games
            .first()
            .map(|g| g.sides[side].name.as_str())
            .unwrap_or("?");
        let evacuated: usize = games.iter().map(|g| g.sides[side].evacuated).sum();
        let destroyed: usize = games.iter().map(|g| g.sides[side].destroyed).sum();
        writeln!(
            out,
            "  {:>10}: {:.2} evacuated, {:.2} destroyed per game",
            name,
            per_game(evacuated),
            per_game(destroyed)
        )?;
    }
    Ok(())
}
