//! Battalion -- two AI sides fight over a hex map in the terminal.
//!
//! The game loop runs on a background thread; this thread redraws the
//! board whenever it changes. Type `q` and enter to stop early.
//!
//! Usage:
//!   battalion [--scenario FILE] [--turns N] [--delay-ms MS] [--seed N] [--quiet]

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{error, info};

use battalion::engine::{run_game, Finish, LoopConfig, SharedGame};
use battalion::render::render_board;
use battalion::scenario::{load_scenario, Scenario};

const REDRAW_POLL: Duration = Duration::from_millis(20);

struct Options {
    scenario: Option<PathBuf>,
    config: LoopConfig,
    seed: u64,
    quiet: bool,
}

fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut opts = Options {
        scenario: None,
        config: LoopConfig::default(),
        seed: 0,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--scenario" => {
                opts.scenario = Some(PathBuf::from(next_value(args, &mut i, flag)?));
            }
            "--turns" => {
                opts.config.max_turns = next_value(args, &mut i, flag)?
                    .parse()
                    .map_err(|_| "invalid --turns value".to_string())?;
            }
            "--delay-ms" => {
                let ms: u64 = next_value(args, &mut i, flag)?
                    .parse()
                    .map_err(|_| "invalid --delay-ms value".to_string())?;
                opts.config.pacing = Duration::from_millis(ms);
            }
            "--seed" => {
                opts.seed = next_value(args, &mut i, flag)?
                    .parse()
                    .map_err(|_| "invalid --seed value".to_string())?;
            }
            "--quiet" => opts.quiet = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(Some(opts))
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {}", flag))
}

fn print_usage() {
    eprintln!("Usage: battalion [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario FILE  Scenario JSON (default: built-in map)");
    eprintln!("  --turns N        Turn limit (default: 10)");
    eprintln!("  --delay-ms MS    Pause between phases (default: 1000)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --quiet          Log warnings only and skip board drawing");
    eprintln!("  --help           Show this help");
}

fn init_tracing(quiet: bool) {
    let level = if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

/// Stops the game when the user types `q` or `quit`. Detached: a blocked
/// read must not hold up shutdown.
fn watch_stdin(shared: Arc<SharedGame>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if matches!(line.trim(), "q" | "quit") {
                info!("stop requested");
                shared.stop();
                break;
            }
        }
    });
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(opts.quiet);

    let scenario = match &opts.scenario {
        Some(path) => match load_scenario(path) {
            Ok(s) => s,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Scenario::classic(),
    };
    let state = match scenario.build() {
        Ok(state) => state,
        Err(e) => {
            error!("invalid scenario: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let shared = Arc::new(SharedGame::new(state));
    watch_stdin(Arc::clone(&shared));

    let game = {
        let shared = Arc::clone(&shared);
        let config = opts.config.clone();
        let seed = opts.seed;
        thread::spawn(move || {
            let mut rng = if seed != 0 {
                SmallRng::seed_from_u64(seed)
            } else {
                SmallRng::from_entropy()
            };
            run_game(&shared, &config, &mut rng)
        })
    };

    while shared.is_running() {
        if !opts.quiet && shared.take_dirty() {
            println!("{}", render_board(&shared.view()));
        }
        thread::sleep(REDRAW_POLL);
    }
    if !opts.quiet && shared.take_dirty() {
        println!("{}", render_board(&shared.view()));
    }

    let summary = match game.join() {
        Ok(Ok(summary)) => summary,
        Ok(Err(e)) => {
            error!("game halted: {}", e);
            return ExitCode::FAILURE;
        }
        Err(_) => {
            error!("game loop panicked");
            return ExitCode::FAILURE;
        }
    };

    for tally in &summary.tallies {
        println!(
            "{}: {} active, {} evacuated, {} destroyed",
            tally.name, tally.active, tally.evacuated, tally.destroyed
        );
    }
    match summary.finish {
        Finish::TurnLimit => println!("GAME OVER: MAX TURNS {} reached.", opts.config.max_turns),
        Finish::Stopped => println!("Stopped after {} turns.", summary.turns_played),
    }
    ExitCode::SUCCESS
}
