//! Running Praat to produce Formant files.
//!
//! Praat is driven in batch mode (`praat --run script args...`) with a small
//! script that reads the sound, runs `To Formant (burg)...` and writes the
//! result as a long text file next to the sound. The script is written to a
//! temporary file for the duration of the call.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Batch script run by Praat. Form fields are filled from the command line.
pub const FORMANT_SCRIPT: &str = r#"form Get formants
    sentence filename
    sentence filename_formant
    word method
    positive time_step 0.005
    positive n_formants 5
    positive max_freq 5500
    positive w_len 0.025
endform
Read from file... 'filename$'
object_name$ = selected$("Sound")
To Formant ('method$')... time_step n_formants max_freq w_len 50
Write to text file... 'filename_formant$'
select all
Remove
clearinfo
"#;

/// Praat's formant estimation method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    /// Burg's LPC algorithm.
    #[default]
    Burg,
}

impl Method {
    /// Parses a method name as used in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "burg" => Some(Self::Burg),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Burg => write!(f, "burg"),
        }
    }
}

/// Parameters for one formant analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct FormantRequest {
    /// Sound file to analyse.
    pub sound: PathBuf,
    /// Estimation method.
    pub method: Method,
    /// Seconds between frames.
    pub time_step: f64,
    /// Formants searched for per frame.
    pub n_formants: f64,
    /// Formant ceiling in Hz.
    pub max_freq: f64,
    /// Window length in seconds.
    pub window_length: f64,
}

impl FormantRequest {
    /// The Formant file Praat will write: the sound path with its extension
    /// replaced by `.formant`.
    #[must_use]
    pub fn formant_path(&self) -> PathBuf {
        self.sound.with_extension("formant")
    }

    /// Arguments following the script path on Praat's command line.
    #[must_use]
    pub fn script_args(&self) -> Vec<String> {
        vec![
            self.sound.display().to_string(),
            self.formant_path().display().to_string(),
            self.method.to_string(),
            self.time_step.to_string(),
            self.n_formants.to_string(),
            self.max_freq.to_string(),
            self.window_length.to_string(),
        ]
    }
}

/// What a Praat run left behind.
#[derive(Debug, Clone)]
pub struct PraatOutcome {
    /// Formant file Praat was asked to write.
    pub formant_path: PathBuf,
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl PraatOutcome {
    /// Converts an unsuccessful exit into [`Error::PraatFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PraatFailed`] if Praat exited with a non-zero status.
    pub fn into_success(self) -> Result<Self> {
        if self.status.success() {
            Ok(self)
        } else {
            Err(Error::PraatFailed {
                status: self.status,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Runs formant analyses with a given Praat executable.
#[derive(Debug, Clone)]
pub struct PraatRunner {
    executable: PathBuf,
}

impl PraatRunner {
    /// Creates a runner for the Praat binary at `executable`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The Praat binary this runner invokes.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Builds the Praat command line for `request` with the script at
    /// `script`.
    #[must_use]
    pub fn command(&self, script: &Path, request: &FormantRequest) -> Command {
        let mut command = Command::new(&self.executable);
        command.arg("--run").arg(script).args(request.script_args());
        command
    }

    /// Runs Praat and waits for it to exit.
    ///
    /// A non-zero exit is not an error here; see
    /// [`PraatOutcome::into_success`].
    ///
    /// # Errors
    ///
    /// Returns an IO error if the script cannot be written or Praat cannot
    /// be started.
    pub fn run(&self, request: &FormantRequest) -> Result<PraatOutcome> {
        let mut script = tempfile::Builder::new()
            .prefix("praatkit-")
            .suffix(".praat")
            .tempfile()?;
        script.write_all(FORMANT_SCRIPT.as_bytes())?;
        script.flush()?;
        // Praat needs the script closed before it can open it on Windows.
        // The file is removed when `script` drops.
        let script = script.into_temp_path();

        let mut command = self.command(&script, request);
        info!(
            praat = %self.executable.display(),
            sound = %request.sound.display(),
            "Running Praat"
        );
        debug!(?command, "Praat command line");

        let output = command.output()?;
        let outcome = PraatOutcome {
            formant_path: request.formant_path(),
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(status = %outcome.status, "Praat exited");
        Ok(outcome)
    }
}
