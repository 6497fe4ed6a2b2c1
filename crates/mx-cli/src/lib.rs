//! # mx-cli — Command Driver for the Matrix Calculator
//!
//! Provides the `mx` command-line interface over the `mx-matrix` engine:
//! operand resolution (named files or standard streams), result writing,
//! pre-execution history logging, and a script mode that replays
//! line-oriented control streams, including ones written for earlier
//! versions of the calculator.
//!
//! ## Subcommands
//!
//! - `mx add` / `mx multiply` / `mx scalar` / `mx transpose` — binary and
//!   unary matrix operations; operands and result default to stdin/stdout
//!   when no paths are given.
//! - `mx determinant` — prints the determinant to stdout.
//! - `mx history` — replays the command log (raw or `--json`).
//! - `mx script` — executes a control stream of commands.

pub mod ops;
pub mod script;

use std::fs::File;
use std::io::{BufReader, StdinLock, Write};
use std::path::Path;

use anyhow::{Context, Result};

use mx_format::{read_matrix, write_matrix, HistoryLog, IoMode, TokenScanner};
use mx_matrix::Matrix;

/// Append a command to the history log, reporting failure without
/// propagating it.
///
/// History is an audit trail, not a precondition: a log that cannot be
/// written must not stop the requested operation. Returns `false` when the
/// append failed so callers that track per-command failures can count it.
pub fn log_command(history: &HistoryLog, command: &str, io_mode: Option<IoMode>) -> bool {
    match history.append(command, io_mode) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(
                command,
                error = %e,
                "could not record command in history; will reattempt on the next command"
            );
            false
        }
    }
}

/// Matrix operand reader over named files or a shared stdin token stream.
///
/// Both operands of a binary operation may arrive back to back on stdin;
/// the scanner is created once and shared so the second read continues
/// where the first stopped.
pub struct OperandSource {
    stdin: Option<TokenScanner<StdinLock<'static>>>,
}

impl OperandSource {
    /// A source with stdin not yet locked.
    pub fn new() -> Self {
        Self { stdin: None }
    }

    /// Read one matrix from `path`, or from stdin when `path` is `None`.
    pub fn read(&mut self, path: Option<&Path>) -> Result<Matrix> {
        match path {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("could not access file '{}'", path.display()))?;
                let mut scanner = TokenScanner::new(BufReader::new(file));
                read_matrix(&mut scanner)
                    .with_context(|| format!("could not read matrix from '{}'", path.display()))
            }
            None => {
                let scanner = self
                    .stdin
                    .get_or_insert_with(|| TokenScanner::new(std::io::stdin().lock()));
                read_matrix(scanner).context("could not read matrix from stdin")
            }
        }
    }
}

impl Default for OperandSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a result matrix to `path` (overwriting), or to stdout when `path`
/// is `None`.
pub fn write_result(path: Option<&Path>, matrix: &Matrix) -> Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("could not create file '{}'", path.display()))?;
            write_matrix(&mut file, matrix)
                .with_context(|| format!("could not write matrix to '{}'", path.display()))
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_matrix(&mut lock, matrix).context("could not write matrix to stdout")?;
            lock.flush()?;
            Ok(())
        }
    }
}
