//! # Operation Subcommands
//!
//! Handlers for the five matrix operations and the `history` command. Each
//! handler logs itself to the history file *before* executing, so failed
//! commands are still auditable, then resolves operands, runs the engine,
//! and writes the result. An unwritable history file is reported and the
//! operation proceeds.
//!
//! On an engine error no output file is written; the operands are simply
//! read and dropped.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;

use mx_format::{HistoryLog, IoMode};
use mx_matrix::Matrix;

use crate::{log_command, write_result, OperandSource};

/// User-facing message for an addition shape mismatch.
pub const MSG_ADD_MISMATCH: &str =
    "Cannot add the matrices. Orders do not match for matrix addition.";
/// User-facing message for a multiplication shape mismatch.
pub const MSG_MULT_MISMATCH: &str =
    "Cannot multiply the matrices. Orders do not match for matrix multiplication.";
/// User-facing message for a non-square determinant request.
pub const MSG_DET_NOT_SQUARE: &str =
    "Cannot find determinant. The input matrix is not a square matrix.";

/// Arguments for the binary operations (`add`, `multiply`).
#[derive(Args, Debug)]
pub struct BinaryArgs {
    /// Left operand file. Reads from stdin when omitted.
    #[arg(value_name = "IN_A")]
    pub in_a: Option<PathBuf>,

    /// Right operand file. Reads from stdin when omitted.
    #[arg(value_name = "IN_B")]
    pub in_b: Option<PathBuf>,

    /// Result file. Writes to stdout when omitted.
    #[arg(value_name = "OUT")]
    pub out: Option<PathBuf>,
}

/// Arguments for `scalar`.
#[derive(Args, Debug)]
pub struct ScalarArgs {
    /// The scalar factor.
    #[arg(value_name = "SCALAR", allow_hyphen_values = true)]
    pub scalar: i64,

    /// Operand file. Reads from stdin when omitted.
    #[arg(value_name = "IN")]
    pub input: Option<PathBuf>,

    /// Result file. Writes to stdout when omitted.
    #[arg(value_name = "OUT")]
    pub out: Option<PathBuf>,
}

/// Arguments for `transpose`.
#[derive(Args, Debug)]
pub struct UnaryArgs {
    /// Operand file. Reads from stdin when omitted.
    #[arg(value_name = "IN")]
    pub input: Option<PathBuf>,

    /// Result file. Writes to stdout when omitted.
    #[arg(value_name = "OUT")]
    pub out: Option<PathBuf>,
}

/// Arguments for `determinant`.
#[derive(Args, Debug)]
pub struct DeterminantArgs {
    /// Operand file. Reads from stdin when omitted.
    #[arg(value_name = "IN")]
    pub input: Option<PathBuf>,
}

/// Arguments for `history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Emit parsed entries as JSON instead of the raw log lines.
    #[arg(long)]
    pub json: bool,
}

/// `mx add` — elementwise sum of two matrices.
pub fn run_add(args: &BinaryArgs, history: &HistoryLog) -> Result<u8> {
    let mode = binary_io_mode(args);
    log_command(history, "add", Some(mode));

    let mut source = OperandSource::new();
    let a = source.read(args.in_a.as_deref())?;
    let b = source.read(args.in_b.as_deref())?;

    let result = a.add(&b).map_err(|e| {
        tracing::debug!(error = %e, "add rejected");
        anyhow!(MSG_ADD_MISMATCH)
    })?;
    write_result(args.out.as_deref(), &result)?;
    Ok(0)
}

/// `mx multiply` — matrix product.
pub fn run_multiply(args: &BinaryArgs, history: &HistoryLog) -> Result<u8> {
    let mode = binary_io_mode(args);
    log_command(history, "multiply", Some(mode));

    let mut source = OperandSource::new();
    let a = source.read(args.in_a.as_deref())?;
    let b = source.read(args.in_b.as_deref())?;

    let result = a.multiply(&b).map_err(|e| {
        tracing::debug!(error = %e, "multiply rejected");
        anyhow!(MSG_MULT_MISMATCH)
    })?;
    write_result(args.out.as_deref(), &result)?;
    Ok(0)
}

/// `mx scalar` — multiply every cell by a scalar.
pub fn run_scalar(args: &ScalarArgs, history: &HistoryLog) -> Result<u8> {
    let mode = io_mode(args.input.is_some() || args.out.is_some());
    log_command(history, "scalar", Some(mode));

    let mut source = OperandSource::new();
    let a = source.read(args.input.as_deref())?;

    write_result(args.out.as_deref(), &a.scalar_mul(args.scalar))?;
    Ok(0)
}

/// `mx transpose`.
pub fn run_transpose(args: &UnaryArgs, history: &HistoryLog) -> Result<u8> {
    let mode = io_mode(args.input.is_some() || args.out.is_some());
    log_command(history, "transpose", Some(mode));

    let mut source = OperandSource::new();
    let a = source.read(args.input.as_deref())?;

    write_result(args.out.as_deref(), &a.transpose())?;
    Ok(0)
}

/// `mx determinant` — always prints to stdout; there is no output file for
/// a scalar result.
pub fn run_determinant(args: &DeterminantArgs, history: &HistoryLog) -> Result<u8> {
    let mode = io_mode(args.input.is_some());
    log_command(history, "determinant", Some(mode));

    let mut source = OperandSource::new();
    let a = source.read(args.input.as_deref())?;

    let det = determinant_checked(&a)?;
    println!("{det}");
    Ok(0)
}

/// `mx history` — log the command itself, then replay the log.
pub fn run_history(args: &HistoryArgs, history: &HistoryLog) -> Result<u8> {
    log_command(history, "history", None);

    if args.json {
        let entries = history.entries()?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        let stdout = std::io::stdout();
        history.replay(&mut stdout.lock())?;
    }
    Ok(0)
}

/// Determinant with the engine's non-square rejection mapped to the
/// driver's user-facing message.
pub(crate) fn determinant_checked(a: &Matrix) -> Result<i64> {
    a.determinant().map_err(|e| {
        tracing::debug!(error = %e, "determinant rejected");
        anyhow!(MSG_DET_NOT_SQUARE)
    })
}

fn binary_io_mode(args: &BinaryArgs) -> IoMode {
    io_mode(args.in_a.is_some() || args.in_b.is_some() || args.out.is_some())
}

/// The logged I/O mode: `Files` if any named path participates.
fn io_mode(any_path: bool) -> IoMode {
    if any_path {
        IoMode::Files
    } else {
        IoMode::Streams
    }
}
