//! CLI entry point for the puzzle solver.
//!
//! Usage:
//!   puzzle-search solve <puzzle.json> [--show-path]
//!   puzzle-search solve --stdin [--show-path]
//!
//! Exit codes: 0 solved, 1 no solution exists, 2 unreadable or invalid input.
//! Search progress is logged to stderr, e.g. `RUST_LOG=puzzle_search=trace`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use puzzle_search::{PuzzleConfig, PuzzleError};

#[derive(Parser)]
#[command(name = "puzzle-search")]
#[command(about = "Minimum-move solver for puzzle state spaces")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the minimum number of moves that solves a puzzle
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Include every state on the solution path in the output
        #[arg(long)]
        show_path: bool,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("must provide either a file path or --stdin")]
    MissingInput,

    #[error("failed to read from stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to read file {path:?}: {source}")]
    File { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Puzzle(#[from] PuzzleError),

    #[error("failed to encode report: {0}")]
    Output(serde_json::Error),
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_default();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(CliError::Stdin)?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| CliError::File { path, source })
    } else {
        Err(CliError::MissingInput)
    }
}

fn solve(file: Option<PathBuf>, stdin: bool, show_path: bool) -> Result<bool, CliError> {
    let json_content = read_input(file, stdin)?;
    let puzzle = PuzzleConfig::from_json(&json_content)?;
    let report = puzzle.solve(show_path)?;

    info!(
        solved = report.solved,
        steps = ?report.steps,
        discovered = report.states_discovered,
        elapsed_ms = report.time_elapsed_ms,
        "search finished"
    );

    let output = serde_json::to_string_pretty(&report).map_err(CliError::Output)?;
    println!("{output}");

    Ok(report.solved)
}

/// 0 solved, 1 no solution exists, 2 unreadable or invalid input
fn exit_status(outcome: &Result<bool, CliError>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve {
            file,
            stdin,
            show_path,
        } => solve(file, stdin, show_path),
    };
    if let Err(e) = &outcome {
        eprintln!("Error: {e}");
    }
    ExitCode::from(exit_status(&outcome))
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn puzzle_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_input() {
        let result = read_input(None, false);
        assert!(matches!(result, Err(CliError::MissingInput)));
        assert_eq!(exit_status(&solve(None, false, false)), 2);
    }

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from("/nonexistent/puzzle.json");
        let err = read_input(Some(path.clone()), false).unwrap_err();

        assert!(matches!(&err, CliError::File { path: p, .. } if *p == path));
        assert!(err.source().is_some());
        assert_eq!(exit_status(&solve(Some(path), false, false)), 2);
    }

    #[test]
    fn test_stdin_error_keeps_source() {
        let err = CliError::Stdin(io::Error::new(io::ErrorKind::InvalidData, "not utf-8"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_solvable_puzzle_exits_zero() {
        let file = puzzle_file(r#"{ "kind": "maze", "grid": ["@.G"] }"#);
        let outcome = solve(Some(file.path().to_path_buf()), false, true);

        assert!(matches!(outcome, Ok(true)));
        assert_eq!(exit_status(&outcome), 0);
    }

    #[test]
    fn test_unsolvable_puzzle_exits_one() {
        let file = puzzle_file(r#"{ "kind": "maze", "grid": ["@#G"] }"#);
        let outcome = solve(Some(file.path().to_path_buf()), false, false);

        assert!(matches!(outcome, Ok(false)));
        assert_eq!(exit_status(&outcome), 1);
    }

    #[test]
    fn test_invalid_puzzle_exits_two() {
        let file = puzzle_file(r#"{ "kind": "maze", "grid": ["@.."] }"#);
        let outcome = solve(Some(file.path().to_path_buf()), false, false);
        assert!(matches!(
            outcome,
            Err(CliError::Puzzle(PuzzleError::MissingGoal))
        ));
        assert_eq!(exit_status(&outcome), 2);

        let file = puzzle_file("not json");
        let outcome = solve(Some(file.path().to_path_buf()), false, false);
        assert!(matches!(outcome, Err(CliError::Puzzle(PuzzleError::Json(_)))));
        assert_eq!(exit_status(&outcome), 2);
    }
}
