//! chessbits-perft - perft, divide and regression suites from the command line.

mod config;
mod report;

use anyhow::Context;
use chessbits_core::Fen;
use chessbits_engine::{generate_moves, perft, perft_divide, Game};
use clap::{Parser, Subcommand};
use config::SuiteConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chessbits-perft")]
#[command(about = "Move generator validation for chessbits-engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count leaf nodes below each root move
    Perft {
        /// Position to start from
        #[arg(long, default_value = Fen::STARTPOS)]
        fen: String,
        /// Search depth in plies
        #[arg(short, long)]
        depth: u32,
        /// Moves to play before counting, in coordinate notation
        #[arg(long, num_args = 1..)]
        moves: Vec<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every position of a suite file against its expected counts
    Suite {
        /// Suite file
        #[arg(long, default_value_os_t = SuiteConfig::default_path())]
        file: PathBuf,
        /// Skip depths beyond this one
        #[arg(long)]
        max_depth: Option<u32>,
    },
    /// List the legal moves of a position with their flags
    Moves {
        /// Position to list
        #[arg(long, default_value = Fen::STARTPOS)]
        fen: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Perft {
            fen,
            depth,
            moves,
            json,
        } => run_perft(&fen, depth, &moves, json),
        Commands::Suite { file, max_depth } => run_suite(&file, max_depth),
        Commands::Moves { fen } => run_moves(&fen),
    }
}

fn run_perft(fen: &str, depth: u32, moves: &[String], json: bool) -> anyhow::Result<ExitCode> {
    let mut game = Game::from_fen(fen).with_context(|| format!("Invalid FEN: {fen}"))?;
    for text in moves {
        let _ = game
            .apply_uci(text)
            .with_context(|| format!("Cannot play {text} in {}", game.to_fen()))?;
    }

    let start_fen = game.to_fen();
    let mut position = game.into_position();
    tracing::info!("Running perft {} on {}", depth, start_fen);
    let report = perft_divide(&mut position, depth);
    tracing::info!(
        "Searched {} nodes in {} ms ({} nps)",
        report.nodes,
        report.elapsed.as_millis(),
        report.nodes_per_second()
    );

    if json {
        println!("{}", report::to_json(&start_fen, &report)?);
    } else {
        println!("{report}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_suite(file: &Path, max_depth: Option<u32>) -> anyhow::Result<ExitCode> {
    let suite = SuiteConfig::load(file)
        .with_context(|| format!("Failed to load suite {}", file.display()))?;
    tracing::info!(
        "Loaded {} positions from {}",
        suite.positions.len(),
        file.display()
    );

    let started = Instant::now();
    let mut checked = 0usize;
    let mut failures = 0usize;

    for entry in &suite.positions {
        let mut position = entry.position()?;
        for (depth, expected) in entry.depths(max_depth) {
            let nodes = perft(&mut position, depth);
            checked += 1;
            if nodes == expected {
                tracing::info!("{} depth {}: {} ok", entry.name, depth, nodes);
            } else {
                failures += 1;
                tracing::warn!(
                    "{} depth {}: expected {}, got {}",
                    entry.name,
                    depth,
                    expected,
                    nodes
                );
            }
        }
    }

    if failures > 0 {
        tracing::error!("{} of {} counts wrong", failures, checked);
        return Ok(ExitCode::FAILURE);
    }
    tracing::info!(
        "All {} counts match ({} ms)",
        checked,
        started.elapsed().as_millis()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_moves(fen: &str) -> anyhow::Result<ExitCode> {
    let game = Game::from_fen(fen).with_context(|| format!("Invalid FEN: {fen}"))?;
    let moves = generate_moves(game.position());
    for &mv in &moves {
        println!("{}", report::describe(mv));
    }
    tracing::info!("{} legal moves", moves.len());
    if let Some(result) = game.result() {
        tracing::info!("Game over: {:?}", result);
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_perft_arguments() {
        let cli = Cli::parse_from([
            "chessbits-perft",
            "perft",
            "--depth",
            "3",
            "--moves",
            "e2e4",
            "e7e5",
            "--json",
        ]);
        match cli.command {
            Commands::Perft {
                fen,
                depth,
                moves,
                json,
            } => {
                assert_eq!(fen, Fen::STARTPOS);
                assert_eq!(depth, 3);
                assert_eq!(moves, vec!["e2e4", "e7e5"]);
                assert!(json);
            }
            _ => panic!("Expected perft command"),
        }
    }

    #[test]
    fn parse_suite_defaults() {
        let cli = Cli::parse_from(["chessbits-perft", "suite"]);
        match cli.command {
            Commands::Suite { file, max_depth } => {
                assert_eq!(file, PathBuf::from("suite.toml"));
                assert_eq!(max_depth, None);
            }
            _ => panic!("Expected suite command"),
        }
    }

    #[test]
    fn perft_rejects_illegal_setup_moves() {
        let err = run_perft(Fen::STARTPOS, 1, &["e2e5".to_string()], false).unwrap_err();
        assert!(err.to_string().contains("Cannot play e2e5"));
    }
}
