//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `formants`: run Praat on a sound file, then export the Formant report
//! - `report`: export an existing Formant file
//! - `textgrid`: print a TextGrid as a MATLAB script or JSON
//!
//! # Global Flags
//!
//! - `-v`: more log output (repeatable)
//! - `--config`: configuration file (default `.praatkit.yaml` if present)
//!
//! # Example
//!
//! ```bash
//! praatkit formants vowel.wav --maxfreq 5000 --export matfile
//! praatkit report vowel.formant --export json
//! praatkit textgrid vowel.TextGrid
//! ```

mod args;
mod execute;
mod types;
mod validators;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

pub use args::{ExportArgs, FormantsArgs, ReportArgs, TextGridArgs};
pub use types::{ExportFormatArg, MethodArg, TextGridFormatArg};
pub use validators::validate_positive;

use crate::config::PraatkitConfig;

/// Praatkit: formant extraction through Praat.
///
/// Runs Praat's formant analysis on sound files and exports the result for
/// MATLAB or as JSON. Also reads existing Formant and TextGrid files.
#[derive(Parser, Debug)]
#[command(name = "praatkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to .praatkit.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute formants for a sound file using Praat
    ///
    /// Writes `<FILE stem>.formant` next to the sound, then exports it.
    /// With the default `--export none` the Formant file path is printed.
    Formants(FormantsArgs),

    /// Export an existing Praat Formant file
    Report(ReportArgs),

    /// Print a TextGrid as a MATLAB script or JSON
    #[command(name = "textgrid")]
    TextGrid(TextGridArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Formants(args) => {
                let config = self.load_config()?;
                execute::execute_formants(args, &config)
            }
            Commands::Report(args) => execute::execute_report(args),
            Commands::TextGrid(args) => execute::execute_textgrid(args),
        }
    }

    fn load_config(&self) -> Result<PraatkitConfig> {
        let dir = std::env::current_dir()?;
        PraatkitConfig::discover(self.config.as_deref(), &dir)
            .context("failed to load configuration")
    }
}
