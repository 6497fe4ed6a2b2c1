//! # Command History Log
//!
//! The append-only audit log of executed commands, replayable via the
//! `history` command. One line per command:
//!
//! ```text
//! LOG::add 1
//! LOG::history
//! ```
//!
//! The optional trailing digit is the I/O mode the command ran with
//! (`0` = standard streams, `1` = files). Commands are logged *before*
//! execution, so a command that later fails still appears in the log.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Default history file name, created in the working directory.
pub const DEFAULT_HISTORY_FILE: &str = "mx_history";

/// Line prefix marking a logged command.
const LOG_PREFIX: &str = "LOG::";

/// Error accessing the history file.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The history file could not be created or opened for append.
    #[error("could not open history file '{path}': {source}")]
    Open {
        /// The history file path.
        path: PathBuf,
        /// Underlying failure.
        source: std::io::Error,
    },

    /// Reading or writing the history file failed.
    #[error("io error on history file: {0}")]
    Io(#[from] std::io::Error),
}

/// How a command's operands and result were routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IoMode {
    /// Operands from stdin, result to stdout.
    Streams,
    /// Operands and result in named files.
    Files,
}

impl IoMode {
    /// The digit persisted in the log line.
    pub fn as_digit(self) -> u8 {
        match self {
            Self::Streams => 0,
            Self::Files => 1,
        }
    }

    /// Parse a persisted digit.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(Self::Streams),
            1 => Some(Self::Files),
            _ => None,
        }
    }
}

/// One parsed history line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// The logged command name.
    pub command: String,
    /// The I/O mode, for commands that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io_mode: Option<IoMode>,
}

/// Handle to the append-only history file.
///
/// The file is created lazily on first append; replaying a log that was
/// never written is an error.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// A log at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The log's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one command line, creating the file if needed.
    pub fn append(&self, command: &str, io_mode: Option<IoMode>) -> Result<(), HistoryError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| HistoryError::Open {
                path: self.path.clone(),
                source,
            })?;

        match io_mode {
            Some(mode) => writeln!(file, "{LOG_PREFIX}{command} {}", mode.as_digit())?,
            None => writeln!(file, "{LOG_PREFIX}{command}")?,
        }
        tracing::debug!(command, ?io_mode, "logged command");
        Ok(())
    }

    /// Stream the raw log contents to a writer (the `history` replay).
    pub fn replay<W: Write>(&self, writer: &mut W) -> Result<(), HistoryError> {
        let mut file = std::fs::File::open(&self.path).map_err(|source| HistoryError::Open {
            path: self.path.clone(),
            source,
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        writer.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Parse the log into structured entries.
    ///
    /// Lines without the `LOG::` prefix are skipped with a warning rather
    /// than failing the whole replay.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let file = std::fs::File::open(&self.path).map_err(|source| HistoryError::Open {
            path: self.path.clone(),
            source,
        })?;

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match parse_line(&line) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(line, "skipping malformed history line"),
            }
        }
        Ok(entries)
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FILE)
    }
}

fn parse_line(line: &str) -> Option<HistoryEntry> {
    let rest = line.strip_prefix(LOG_PREFIX)?;
    match rest.split_once(' ') {
        Some((command, digit)) => {
            let io_mode = IoMode::from_digit(digit.trim().parse().ok()?)?;
            Some(HistoryEntry {
                command: command.to_string(),
                io_mode: Some(io_mode),
            })
        }
        None => Some(HistoryEntry {
            command: rest.to_string(),
            io_mode: None,
        }),
    }
}
