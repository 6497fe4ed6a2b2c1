//! # Script Mode — Control-Stream Replay
//!
//! Executes the line-oriented batch control protocol, kept compatible with
//! control streams written for earlier versions of the calculator: a
//! leading command count, then that many commands. Each command is an
//! operation name, an I/O mode digit, and — depending on the operation —
//! a scalar factor and file paths:
//!
//! ```text
//! 3
//! add_matrix 1 a.mx b.mx sum.mx
//! scalar_mult_matrix 0 2
//! 2 2
//! 1 2
//! 3 4
//! history
//! ```
//!
//! With I/O mode `0` the operand cells follow the command on the *same*
//! stream; commands and operands share one token scanner.
//! A failed command is reported and the stream continues; only a
//! desynchronizing error (an I/O mode that is neither 0 nor 1, or a
//! truncated stream) is allowed to end the run early, since past that
//! point the remaining tokens cannot be trusted to line up with the
//! grammar.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;

use mx_format::{read_matrix, write_matrix, HistoryLog, IoMode, TokenScanner};
use mx_matrix::Matrix;

use crate::ops::{determinant_checked, MSG_ADD_MISMATCH, MSG_MULT_MISMATCH};
use crate::{log_command, write_result, OperandSource};

/// User-facing message for an unusable I/O mode digit.
pub const MSG_BAD_IO_MODE: &str = "Incorrect I/O mode entered. Should be either 0 or 1.";
/// User-facing message for an unknown operation name.
pub const MSG_INVALID_OPERATION: &str = "Invalid operation chosen. Enter operation from among \
     'add_matrix', 'mult_matrix', 'scalar_mult_matrix', 'transpose_matrix', 'determinant', \
     and 'history'.";

// Operation names of the control protocol. `determi` is the historical
// spelling persisted by earlier logs; both it and the full word are accepted.
const CMD_ADD: &str = "add_matrix";
const CMD_MULT: &str = "mult_matrix";
const CMD_SCALAR: &str = "scalar_mult_matrix";
const CMD_TRANSPOSE: &str = "transpose_matrix";
const CMD_DET_HISTORICAL: &str = "determi";
const CMD_DET: &str = "determinant";
const CMD_HISTORY: &str = "history";

/// Arguments for `mx script`.
#[derive(Args, Debug)]
pub struct ScriptArgs {
    /// Control-stream file. Reads the stream from stdin when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// `mx script` — execute a control stream from a file or stdin.
pub fn run_script(args: &ScriptArgs, history: &HistoryLog) -> Result<u8> {
    let stdout = std::io::stdout();
    match &args.file {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("could not access file '{}'", path.display()))?;
            execute_stream(BufReader::new(file), &mut stdout.lock(), history)
        }
        None => execute_stream(std::io::stdin().lock(), &mut stdout.lock(), history),
    }
}

/// Execute a control stream, writing stream-mode results to `out`.
///
/// Returns exit code 0 when every command succeeded, 1 otherwise. An
/// unwritable history file counts as a failure for the exit code but
/// never stops the run.
pub fn execute_stream<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    history: &HistoryLog,
) -> Result<u8> {
    let mut scanner = TokenScanner::new(reader);
    let count: usize = scanner
        .next_int("command count")
        .map_err(|e| anyhow!("control stream: {e}"))?;

    tracing::info!(count, "executing control stream");

    let mut failures = 0usize;
    for index in 0..count {
        let op = match scanner.next_token()? {
            Some(op) => op.to_string(),
            None => {
                tracing::error!(
                    executed = index,
                    expected = count,
                    "control stream ended early"
                );
                failures += 1;
                break;
            }
        };

        match op.as_str() {
            CMD_HISTORY => {
                if !log_command(history, &op, None) {
                    failures += 1;
                }
                if let Err(e) = history.replay(out) {
                    tracing::error!("{e:#}");
                    failures += 1;
                }
            }
            CMD_ADD | CMD_MULT | CMD_SCALAR | CMD_TRANSPOSE | CMD_DET_HISTORICAL | CMD_DET => {
                let digit: u8 = scanner
                    .next_int("io mode")
                    .map_err(|e| anyhow!("control stream: {e}"))?;
                let mode = IoMode::from_digit(digit)
                    .ok_or_else(|| anyhow!(MSG_BAD_IO_MODE))?;
                if !log_command(history, &op, Some(mode)) {
                    failures += 1;
                }

                if let Err(e) = run_operation(&op, mode, &mut scanner, out) {
                    tracing::error!(command = %op, "{e:#}");
                    failures += 1;
                }
            }
            _ => {
                tracing::error!(command = %op, "{MSG_INVALID_OPERATION}");
                failures += 1;
            }
        }
    }

    Ok(u8::from(failures > 0))
}

/// One operation command past its name and mode. The grammar tokens
/// (scalar, paths, inline operand cells) are consumed here; operation
/// failures bubble up for the caller to report without ending the run.
fn run_operation<R: BufRead, W: Write>(
    op: &str,
    mode: IoMode,
    scanner: &mut TokenScanner<R>,
    out: &mut W,
) -> Result<()> {
    match op {
        CMD_ADD | CMD_MULT => {
            let (a, b, out_path) = match mode {
                IoMode::Files => {
                    let path_a = next_path(scanner, "left operand path")?;
                    let path_b = next_path(scanner, "right operand path")?;
                    let path_out = next_path(scanner, "result path")?;
                    (
                        read_operand_file(&path_a)?,
                        read_operand_file(&path_b)?,
                        Some(path_out),
                    )
                }
                IoMode::Streams => (
                    read_inline(scanner)?,
                    read_inline(scanner)?,
                    None,
                ),
            };

            let result = if op == CMD_ADD {
                a.add(&b).map_err(|_| anyhow!(MSG_ADD_MISMATCH))?
            } else {
                a.multiply(&b).map_err(|_| anyhow!(MSG_MULT_MISMATCH))?
            };
            emit(out, out_path.as_deref(), &result)
        }

        CMD_SCALAR => {
            let scalar: i64 = scanner.next_int("scalar factor")?;
            let (a, out_path) = unary_operand(mode, scanner)?;
            emit(out, out_path.as_deref(), &a.scalar_mul(scalar))
        }

        CMD_TRANSPOSE => {
            let (a, out_path) = unary_operand(mode, scanner)?;
            emit(out, out_path.as_deref(), &a.transpose())
        }

        CMD_DET_HISTORICAL | CMD_DET => {
            let a = match mode {
                IoMode::Files => read_operand_file(&next_path(scanner, "operand path")?)?,
                IoMode::Streams => read_inline(scanner)?,
            };
            let det = determinant_checked(&a)?;
            writeln!(out, "{det}")?;
            Ok(())
        }

        // Callers only dispatch the names above.
        _ => Err(anyhow!(MSG_INVALID_OPERATION)),
    }
}

/// Operand and result path for the single-operand operations: one input
/// path and one output path with mode 1, an inline operand with mode 0.
fn unary_operand<R: BufRead>(
    mode: IoMode,
    scanner: &mut TokenScanner<R>,
) -> Result<(Matrix, Option<PathBuf>)> {
    match mode {
        IoMode::Files => {
            let path_in = next_path(scanner, "operand path")?;
            let path_out = next_path(scanner, "result path")?;
            Ok((read_operand_file(&path_in)?, Some(path_out)))
        }
        IoMode::Streams => Ok((read_inline(scanner)?, None)),
    }
}

fn next_path<R: BufRead>(scanner: &mut TokenScanner<R>, what: &str) -> Result<PathBuf> {
    match scanner.next_token()? {
        Some(token) => Ok(PathBuf::from(token)),
        None => Err(anyhow!(
            "unexpected end of control stream while reading {what}"
        )),
    }
}

fn read_operand_file(path: &std::path::Path) -> Result<Matrix> {
    OperandSource::new().read(Some(path))
}

fn read_inline<R: BufRead>(scanner: &mut TokenScanner<R>) -> Result<Matrix> {
    read_matrix(scanner).context("could not read inline matrix operand")
}

fn emit<W: Write>(out: &mut W, path: Option<&std::path::Path>, matrix: &Matrix) -> Result<()> {
    match path {
        Some(path) => write_result(Some(path), matrix),
        None => {
            write_matrix(out, matrix)?;
            Ok(())
        }
    }
}
