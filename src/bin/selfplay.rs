//! Headless batch play.
//!
//! Plays games without pacing and writes one JSON summary per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N        Number of games to play (default: 10)
//!   --turns N        Turn limit per game (default: 10)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --scenario FILE  Scenario JSON (default: built-in map)
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use tracing::{error, info};

use battalion::scenario::load_scenario;
use battalion::selfplay::{self, GameRecord, SelfPlayConfig};

fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize) -> Result<T, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .ok_or_else(|| format!("missing value for {}", flag))?
        .parse()
        .map_err(|_| format!("invalid {} value", flag))
}

fn parse_args(args: &[String]) -> Result<Option<(SelfPlayConfig, Option<PathBuf>)>, String> {
    let mut config = SelfPlayConfig::default();
    let mut output_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => config.num_games = parse_value(args, &mut i)?,
            "--turns" => config.max_turns = parse_value(args, &mut i)?,
            "--threads" => config.threads = parse_value(args, &mut i)?,
            "--seed" => config.seed = parse_value(args, &mut i)?,
            "--scenario" => {
                let path: PathBuf = parse_value(args, &mut i)?;
                config.scenario = load_scenario(&path)
                    .map_err(|e| format!("{}: {}", path.display(), e))?;
            }
            "--output" => output_path = Some(parse_value(args, &mut i)?),
            "--quiet" => config.quiet = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(Some((config, output_path)))
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --turns N        Turn limit per game (default: 10)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --scenario FILE  Scenario JSON (default: built-in map)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}

fn write_output(games: &[GameRecord], path: Option<&PathBuf>) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            selfplay::write_jsonl(games, &mut writer)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(games, &mut writer)
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let (config, output_path) = match parse_args(&args) {
        Ok(Some(parsed)) => parsed,
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

    let level = if config.quiet {
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

    info!(
        "Self-play: {} games, {} turns, {} threads",
        config.num_games, config.max_turns, config.threads
    );

    let start = Instant::now();
    let games = match selfplay::run_self_play(&config) {
        Ok(games) => games,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let elapsed = start.elapsed();
    info!(
        "Completed {} games in {:.2}s",
        games.len(),
        elapsed.as_secs_f64()
    );

    if !config.quiet {
        let mut stderr = io::stderr().lock();
        let _ = selfplay::write_summary(&games, &mut stderr);
        let _ = stderr.flush();
    }

    if let Err(e) = write_output(&games, output_path.as_ref()) {
        error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }
    if let Some(path) = &output_path {
        info!("Wrote {} games to {}", games.len(), path.display());
    }
    ExitCode::SUCCESS
}
