//! Error types for praat-text operations.

use std::io;
use thiserror::Error;

/// The error type for praat-text operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is not a file of the expected dialect, or a required
    /// field could not be located.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// An export or accessor was used before a report was loaded.
    #[error("state error: {0}")]
    State(String),
}

/// Why a source file was rejected.
///
/// Every variant carries the 1-based line number the problem was detected at,
/// so a truncated or hand-edited file can be located quickly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// A dialect header line is missing or differs from the expected literal.
    #[error("line {line_number}: expected header '{expected}', found '{found}'")]
    HeaderMismatch {
        /// 1-based line number of the offending line.
        line_number: usize,
        /// The literal the line should have been.
        expected: &'static str,
        /// The trimmed content actually found (empty if the input ended).
        found: String,
    },

    /// A forward search for a required field or marker ran off its range.
    #[error("expected field '{field}' not found after line {line_number}")]
    FieldNotFound {
        /// Name of the field or marker being searched for.
        field: String,
        /// 1-based number of the last line before the searched range
        /// (0 when the search started at the top of the file).
        line_number: usize,
    },

    /// A field was found but its value is not a number of the expected kind.
    #[error("line {line_number}: invalid value '{value}' for field '{field}'")]
    InvalidNumber {
        /// Name of the field.
        field: String,
        /// 1-based line number.
        line_number: usize,
        /// The raw value token.
        value: String,
    },

    /// A record header was found but the input ends before its fields.
    #[error("line {line_number}: record '{record}' is truncated")]
    TruncatedRecord {
        /// The record kind, e.g. `intervals`.
        record: &'static str,
        /// 1-based line number of the record header.
        line_number: usize,
    },
}

impl FormatError {
    /// Returns the 1-based line number associated with this error.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::HeaderMismatch { line_number, .. }
            | Self::FieldNotFound { line_number, .. }
            | Self::InvalidNumber { line_number, .. }
            | Self::TruncatedRecord { line_number, .. } => *line_number,
        }
    }
}

/// A specialized Result type for praat-text operations.
pub type Result<T> = std::result::Result<T, Error>;
