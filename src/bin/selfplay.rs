//! Self-play game generation CLI.
//!
//! Plays Hex games against itself or a random mover and writes one JSON
//! object per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]
//!
//! Options:
//!   --games N        Number of games to play (default: 10)
//!   --time T         Clock per side in seconds (default: 60)
//!   --size N         Board dimension (default: 11)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --opponent KIND  engine or random (default: engine)
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use hexbandit::board::MAX_DIMENSION;
use hexbandit::selfplay::{self, SelfPlayConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SelfPlayConfig::default();
    let mut output_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => config.num_games = value(&args, &mut i),
            "--time" => config.clock_secs = value(&args, &mut i),
            "--size" => config.size = value(&args, &mut i),
            "--seed" => config.seed = value(&args, &mut i),
            "--opponent" => config.opponent = value(&args, &mut i),
            "--output" => output_path = Some(value(&args, &mut i)),
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    if config.size == 0 || config.size > MAX_DIMENSION {
        eprintln!("--size must be between 1 and {}", MAX_DIMENSION);
        process::exit(1);
    }

    if !config.quiet {
        eprintln!(
            "Self-play: {} games, {}x{} board, {:.1}s per side, opponent {}",
            config.num_games, config.size, config.size, config.clock_secs, config.opponent
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config);
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&games);
    }

    let result = match &output_path {
        Some(path) => File::create(path)
            .and_then(|file| selfplay::write_jsonl(&games, &mut BufWriter::new(file))),
        None => {
            let stdout = io::stdout();
            selfplay::write_jsonl(&games, &mut BufWriter::new(stdout.lock()))
        }
    };
    match (result, output_path) {
        (Err(e), _) => {
            eprintln!("failed to write output: {}", e);
            process::exit(1);
        }
        (Ok(()), Some(path)) if !config.quiet => {
            eprintln!("Wrote {} games to {}", games.len(), path);
        }
        _ => {}
    }
}

/// Parses the value following the flag at `args[*i]`, advancing `i`.
/// Exits with usage on a missing or malformed value.
fn value<T: FromStr>(args: &[String], i: &mut usize) -> T {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i).map(|v| v.parse::<T>()) {
        Some(Ok(v)) => v,
        _ => {
            eprintln!("invalid {} value", flag);
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: selfplay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --time T         Clock per side in seconds (default: 60)");
    eprintln!("  --size N         Board dimension (default: 11)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --opponent KIND  engine or random (default: engine)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress summary output");
    eprintln!("  --help           Show this help");
}
