//! CLI argument structs for all commands.
//!
//! Each command has its own argument struct with clap derive attributes
//! for parsing and validation.

use std::path::PathBuf;

use clap::Parser;

use super::types::{ExportFormatArg, MethodArg, TextGridFormatArg};
use super::validators::validate_positive;

/// Export options shared by `formants` and `report`
#[derive(Parser, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Format in which the data should be exported
    ///
    /// File formats write a file and print its path. Without --exportfile
    /// the file is named after the Formant file (`.mat` or `.json` appended).
    #[arg(long, value_enum, default_value_t = ExportFormatArg::None)]
    pub export: ExportFormatArg,

    /// File to which the data will be exported (file formats only)
    #[arg(long, value_name = "PATH")]
    pub exportfile: Option<PathBuf>,
}

/// Arguments for the `formants` command
#[derive(Parser, Debug, Clone)]
pub struct FormantsArgs {
    /// The sound file to process
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// The method used to extract the formants
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Time between two consecutive formant estimates, in seconds [default: 0.00625]
    #[arg(long, value_name = "TIME_STEP", value_parser = validate_positive)]
    pub timestep: Option<f64>,

    /// Analysis window length, in seconds [default: 0.025]
    #[arg(long, value_name = "W_LEN", value_parser = validate_positive)]
    pub wlen: Option<f64>,

    /// Maximal formant frequency, in Hz [default: 5500]
    #[arg(long, value_name = "MAX_FREQ", value_parser = validate_positive)]
    pub maxfreq: Option<f64>,

    /// Number of formants to search for [default: 5]
    #[arg(long, value_name = "N_FORMANTS", value_parser = validate_positive)]
    pub nformants: Option<f64>,

    /// Praat executable (overrides PRAATKIT_PRAAT and the config file)
    #[arg(long, value_name = "PATH")]
    pub praat: Option<PathBuf>,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Arguments for the `report` command
#[derive(Parser, Debug, Clone)]
pub struct ReportArgs {
    /// A Praat Formant file (long text format)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Arguments for the `textgrid` command
#[derive(Parser, Debug, Clone)]
pub struct TextGridArgs {
    /// A Praat TextGrid file (long text format)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = TextGridFormatArg::Matlab)]
    pub format: TextGridFormatArg,
}
