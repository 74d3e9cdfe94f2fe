//! Error types for CSV storage.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a load or a save.
#[derive(Debug, Error)]
pub enum Error {
    /// The file to load does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Check whether this is [`Error::FileNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::FileNotFound(_))
    }
}

/// Result type for CSV operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A malformed row that was skipped during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source file.
    pub line: u64,
    /// Why the row was dropped.
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The row does not have exactly four fields.
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    /// A numeric column did not hold a non-negative integer.
    #[error("invalid {column} {value:?}")]
    InvalidNumber { column: &'static str, value: String },

    /// The name column was blank.
    #[error("empty name")]
    EmptyName,

    /// The row is not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,

    /// Another row already uses the same normalized name.
    #[error("duplicate name {0:?}")]
    DuplicateName(String),
}
