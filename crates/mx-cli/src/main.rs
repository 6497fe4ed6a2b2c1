//! # mx CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; verbosity and the history file location are
//! global flags shared by every subcommand.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mx_cli::ops::{
    run_add, run_determinant, run_history, run_multiply, run_scalar, run_transpose, BinaryArgs,
    DeterminantArgs, HistoryArgs, ScalarArgs, UnaryArgs,
};
use mx_cli::script::{run_script, ScriptArgs};
use mx_format::{HistoryLog, DEFAULT_HISTORY_FILE};

/// mx — integer matrix calculator.
///
/// Reads matrix operands from files or stdin, performs dense integer
/// matrix operations, writes results to files or stdout, and keeps a
/// replayable log of executed commands.
#[derive(Parser, Debug)]
#[command(name = "mx", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path of the command history file.
    #[arg(long, global = true, default_value = DEFAULT_HISTORY_FILE)]
    history_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add two matrices of identical shape.
    Add(BinaryArgs),

    /// Multiply two matrices (left columns must match right rows).
    Multiply(BinaryArgs),

    /// Multiply every cell of a matrix by a scalar.
    Scalar(ScalarArgs),

    /// Transpose a matrix.
    Transpose(UnaryArgs),

    /// Compute the determinant of a square matrix.
    Determinant(DeterminantArgs),

    /// Replay the command history log.
    History(HistoryArgs),

    /// Execute a control stream of commands from a file or stdin.
    Script(ScriptArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let history = HistoryLog::new(&cli.history_file);
    tracing::debug!(history_file = %cli.history_file.display(), "mx starting");

    let result = match cli.command {
        Commands::Add(args) => run_add(&args, &history),
        Commands::Multiply(args) => run_multiply(&args, &history),
        Commands::Scalar(args) => run_scalar(&args, &history),
        Commands::Transpose(args) => run_transpose(&args, &history),
        Commands::Determinant(args) => run_determinant(&args, &history),
        Commands::History(args) => run_history(&args, &history),
        Commands::Script(args) => run_script(&args, &history),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
