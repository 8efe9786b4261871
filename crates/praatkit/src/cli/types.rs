//! CLI value enums and their conversions.

use clap::ValueEnum;

use crate::praat::Method;

/// Formant estimation method for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    /// Burg's LPC algorithm
    Burg,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Burg => Self::Burg,
        }
    }
}

/// How a Formant report is handed back
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormatArg {
    /// Print the path of the Formant file
    #[default]
    None,
    /// Print a MATLAB struct(...) expression
    #[value(name = "matlabliteral")]
    MatlabLiteral,
    /// Write a MAT-file and print its path
    #[value(name = "matfile")]
    MatFile,
    /// Print JSON
    Json,
    /// Write a JSON file and print its path
    #[value(name = "jsonfile")]
    JsonFile,
}

impl ExportFormatArg {
    /// Extension appended to the Formant path when no export file is given.
    #[must_use]
    pub fn default_extension(self) -> Option<&'static str> {
        match self {
            Self::MatFile => Some("mat"),
            Self::JsonFile => Some("json"),
            Self::None | Self::MatlabLiteral | Self::Json => None,
        }
    }
}

impl std::fmt::Display for ExportFormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::MatlabLiteral => write!(f, "matlabliteral"),
            Self::MatFile => write!(f, "matfile"),
            Self::Json => write!(f, "json"),
            Self::JsonFile => write!(f, "jsonfile"),
        }
    }
}

/// Output format for the `textgrid` command
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextGridFormatArg {
    /// MATLAB script building x.interval(tier).label(i)
    #[default]
    Matlab,
    /// JSON document
    Json,
}
