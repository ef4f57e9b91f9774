//! Batch simulation CLI.
//!
//! Plays random-agent games and writes one JSON record per game (JSONL).
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --games N        Number of games to play (default: 10)
//!   --players N      Seats per game (default: 4)
//!   --max-turns N    Turn limit per game (default: 2000)
//!   --pass P         Chance of ending a turn before each attack (default: 0.2)
//!   --threads N      Number of parallel threads (default: 4)
//!   --seed N         Random seed, 0 for entropy (default: 0)
//!   --grid WxH       Play on a W by H grid (default: 8x6)
//!   --board FILE     Play on a board read from JSON {"areas": N, "adjacency": [[a, b], ...]}
//!   --rules FILE     Rule overrides as JSON, e.g. {"max_dice": 10}
//!   --output FILE    Output file path (default: stdout)
//!   --quiet          Suppress progress and summary output
//!
//! Log verbosity follows `RUST_LOG` (default: info).

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::EnvFilter;

use dicewars_engine::board::Board;
use dicewars_engine::rules::Rules;
use dicewars_engine::simulate::{self, SimulationConfig, Summary};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut config = SimulationConfig::default();
    let mut output_path: Option<String> = None;
    let mut board_path: Option<String> = None;
    let mut rules_path: Option<String> = None;
    let mut grid = (8u16, 6u16);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => config.num_games = value(&args, &mut i),
            "--players" => config.players = value(&args, &mut i),
            "--max-turns" => config.max_turns = value(&args, &mut i),
            "--pass" => config.pass_chance = value(&args, &mut i),
            "--threads" => config.threads = value(&args, &mut i),
            "--seed" => config.seed = value(&args, &mut i),
            "--grid" => {
                let raw: String = value(&args, &mut i);
                grid = parse_grid(&raw).unwrap_or_else(|| fail(&format!("invalid --grid value: {raw}")));
            }
            "--board" => board_path = Some(value(&args, &mut i)),
            "--rules" => rules_path = Some(value(&args, &mut i)),
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

    if let Some(path) = rules_path {
        let text = fs::read_to_string(&path).unwrap_or_else(|e| fail(&format!("cannot read {path}: {e}")));
        config.rules = Rules::from_json(&text).unwrap_or_else(|e| fail(&format!("invalid rules in {path}: {e}")));
    }

    let board = match board_path {
        Some(path) => {
            let text = fs::read_to_string(&path).unwrap_or_else(|e| fail(&format!("cannot read {path}: {e}")));
            serde_json::from_str::<Board>(&text).unwrap_or_else(|e| fail(&format!("invalid board in {path}: {e}")))
        }
        None => Board::grid(grid.0, grid.1).unwrap_or_else(|e| fail(&format!("invalid grid: {e}"))),
    };
    let board = Arc::new(board);

    if !config.quiet {
        tracing::info!(
            "Simulation: {} games, {} players, {} areas, max {} turns, {} threads",
            config.num_games,
            config.players,
            board.area_count(),
            config.max_turns,
            config.threads
        );
    }

    let start = Instant::now();
    let records = simulate::run_simulation(board, &config).unwrap_or_else(|e| fail(&e.to_string()));
    let elapsed = start.elapsed();

    if !config.quiet {
        tracing::info!(
            "Completed {} games in {:.1}s ({:.1} games/s)",
            records.len(),
            elapsed.as_secs_f64(),
            records.len() as f64 / elapsed.as_secs_f64().max(1e-9)
        );
        eprint!("{}", Summary::from_records(&records, config.players));
    }

    let written = match &output_path {
        Some(path) => {
            let file = File::create(path).unwrap_or_else(|e| fail(&format!("cannot create {path}: {e}")));
            simulate::write_jsonl(&records, &mut BufWriter::new(file))
        }
        None => {
            let stdout = io::stdout();
            simulate::write_jsonl(&records, &mut BufWriter::new(stdout.lock()))
        }
    };
    if let Err(e) = written {
        fail(&format!("failed to write output: {e}"));
    }
    if let (Some(path), false) = (&output_path, config.quiet) {
        tracing::info!("Wrote {} games to {}", records.len(), path);
    }
}

/// Parses the value following the flag at `args[*i]`, advancing `i`.
fn value<T: FromStr>(args: &[String], i: &mut usize) -> T {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i).map(|s| s.parse()) {
        Some(Ok(v)) => v,
        _ => fail(&format!("invalid {flag} value")),
    }
}

/// Parses "WxH".
fn parse_grid(s: &str) -> Option<(u16, u16)> {
    let (w, h) = s.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn print_usage() {
    eprintln!("Usage: simulate [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --players N      Seats per game (default: 4)");
    eprintln!("  --max-turns N    Turn limit per game (default: 2000)");
    eprintln!("  --pass P         Chance of ending a turn before each attack (default: 0.2)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --grid WxH       Play on a W by H grid (default: 8x6)");
    eprintln!("  --board FILE     Play on a board read from JSON");
    eprintln!("  --rules FILE     Rule overrides as JSON");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
