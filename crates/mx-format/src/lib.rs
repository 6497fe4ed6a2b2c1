//! # mx-format — Matrix Text Format & History Log
//!
//! Everything the `mx` driver persists or replays lives here:
//!
//! - The line-oriented textual matrix format: two leading integers
//!   `rows cols`, then `rows * cols` integers in row-major order,
//!   whitespace-separated. [`write_matrix`] reproduces the persisted byte
//!   format exactly, so files written by any version of the calculator
//!   remain interoperable.
//! - The append-only command history file (`mx_history` by default), whose
//!   raw contents the `history` command replays.
//!
//! Reading is built on [`TokenScanner`], an incremental whitespace token
//! reader. Incremental matters: two operands can arrive back to back on one
//! stdin stream, and in script mode commands and operand cells interleave
//! on the same stream.

pub mod history;
pub mod text;

// Re-export primary types for ergonomic imports.
pub use history::{HistoryEntry, HistoryError, HistoryLog, IoMode, DEFAULT_HISTORY_FILE};
pub use text::{read_matrix, render_matrix, write_matrix, FormatError, TokenScanner};
