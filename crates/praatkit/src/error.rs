//! Error types for praatkit operations.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// The error type for praatkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A Praat text file could not be read or exported.
    #[error(transparent)]
    Text(#[from] praat_text::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The Praat executable does not exist at the resolved path.
    #[error("could not find Praat at {}", .0.display())]
    PraatNotFound(PathBuf),

    /// No default Praat location is known for this platform.
    #[error("no default Praat location for platform '{0}'; set praat-path or PRAATKIT_PRAAT")]
    UnsupportedPlatform(&'static str),

    /// Praat ran but exited unsuccessfully.
    #[error("formant extraction failed ({status}): {stderr}")]
    PraatFailed {
        /// Exit status reported by the process.
        status: ExitStatus,
        /// Captured standard error.
        stderr: String,
    },
}

/// A specialized Result type for praatkit operations.
pub type Result<T> = std::result::Result<T, Error>;
