//! Configuration loading and Praat path resolution.
//!
//! Settings come from a YAML file (`--config <path>`, or `.praatkit.yaml` in
//! the working directory when present). Every key is optional:
//!
//! ```yaml
//! praat-path: /usr/bin/praat
//! analysis:
//!   method: burg
//!   time-step: 0.00625
//!   n-formants: 5
//!   max-freq: 5500
//!   window-length: 0.025
//! ```
//!
//! Precedence, highest first: command-line flags, the `PRAATKIT_PRAAT`
//! environment variable (Praat path only), the file, built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".praatkit.yaml";

/// Environment variable overriding the configured Praat path.
pub const PRAAT_ENV_VAR: &str = "PRAATKIT_PRAAT";

/// Seconds between analysis frames.
pub const DEFAULT_TIME_STEP: f64 = 0.00625;
/// Formants searched for per frame.
pub const DEFAULT_N_FORMANTS: f64 = 5.0;
/// Formant ceiling in Hz.
pub const DEFAULT_MAX_FREQ: f64 = 5500.0;
/// Analysis window length in seconds.
pub const DEFAULT_WINDOW_LENGTH: f64 = 0.025;

/// Contents of a praatkit configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PraatkitConfig {
    /// Location of the Praat executable.
    #[serde(rename = "praat-path", default)]
    pub praat_path: Option<PathBuf>,

    /// Default analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// The `analysis` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Formant method name.
    #[serde(default)]
    pub method: Option<String>,
    /// Seconds between frames.
    #[serde(default)]
    pub time_step: Option<f64>,
    /// Formants per frame.
    #[serde(default)]
    pub n_formants: Option<f64>,
    /// Formant ceiling in Hz.
    #[serde(default)]
    pub max_freq: Option<f64>,
    /// Window length in seconds.
    #[serde(default)]
    pub window_length: Option<f64>,
}

impl PraatkitConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads `explicit` if given, else `.praatkit.yaml` in `dir` if it
    /// exists, else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let numbers = [
            ("time-step", self.analysis.time_step),
            ("n-formants", self.analysis.n_formants),
            ("max-freq", self.analysis.max_freq),
            ("window-length", self.analysis.window_length),
        ];
        for (key, value) in numbers {
            if let Some(v) = value
                && !(v.is_finite() && v > 0.0)
            {
                return Err(Error::Config(format!(
                    "analysis.{key} must be a positive number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Resolves the Praat executable, honouring `PRAATKIT_PRAAT`.
    ///
    /// # Errors
    ///
    /// See [`resolve_praat_path`].
    pub fn praat_path(&self, flag: Option<&Path>) -> Result<PathBuf> {
        let from_env = std::env::var_os(PRAAT_ENV_VAR).map(PathBuf::from);
        resolve_praat_path(flag, from_env, self.praat_path.as_deref())
    }
}

/// Picks the Praat executable from, in order, a flag, the environment, the
/// config file or the platform default, and checks that it exists.
///
/// # Errors
///
/// Returns [`Error::UnsupportedPlatform`] if nothing is configured and the
/// platform has no default, or [`Error::PraatNotFound`] if the chosen path
/// does not exist.
pub fn resolve_praat_path(
    flag: Option<&Path>,
    from_env: Option<PathBuf>,
    configured: Option<&Path>,
) -> Result<PathBuf> {
    let path = match flag.map(Path::to_path_buf).or(from_env) {
        Some(path) => path,
        None => match configured {
            Some(path) => path.to_path_buf(),
            None => default_praat_path()?,
        },
    };
    if !path.exists() {
        return Err(Error::PraatNotFound(path));
    }
    debug!(path = %path.display(), "Using Praat");
    Ok(path)
}

/// Where Praat is usually installed on this platform.
///
/// # Errors
///
/// Returns [`Error::UnsupportedPlatform`] outside macOS, Windows and Linux.
pub fn default_praat_path() -> Result<PathBuf> {
    match std::env::consts::OS {
        "macos" => Ok(PathBuf::from("/Applications/Praat.app/Contents/MacOS/Praat")),
        "windows" => Ok(PathBuf::from(r"C:\Program Files\Praat.exe")),
        "linux" => Ok(PathBuf::from("/usr/bin/praat")),
        other => Err(Error::UnsupportedPlatform(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let config: PraatkitConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PraatkitConfig::default());
    }

    #[test]
    fn reads_kebab_case_keys() {
        let yaml = "praat-path: /opt/praat\nanalysis:\n  time-step: 0.01\n  n-formants: 4\n";
        let config: PraatkitConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.praat_path, Some(PathBuf::from("/opt/praat")));
        assert_eq!(config.analysis.time_step, Some(0.01));
        assert_eq!(config.analysis.n_formants, Some(4.0));
        assert_eq!(config.analysis.max_freq, None);
    }

    #[test]
    fn unknown_key_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.yaml");
        fs::write(&path, "praat: /usr/bin/praat\n").unwrap();
        assert!(matches!(
            PraatkitConfig::load(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn non_positive_value_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c.yaml");
        fs::write(&path, "analysis:\n  max-freq: 0\n").unwrap();
        let err = PraatkitConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("analysis.max-freq"));
    }

    #[test]
    fn discover_finds_file_in_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "praat-path: /opt/praat\nanalysis:\n  window-length: 0.03\n",
        )
        .unwrap();

        let config = PraatkitConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.praat_path, Some(PathBuf::from("/opt/praat")));
        assert_eq!(config.analysis.window_length, Some(0.03));
    }

    #[test]
    fn discover_without_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = PraatkitConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, PraatkitConfig::default());
    }

    #[test]
    fn discover_with_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            PraatkitConfig::discover(Some(&missing), dir.path()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn flag_wins_over_env_and_config() {
        let dir = TempDir::new().unwrap();
        let flag = dir.path().join("flag-praat");
        fs::write(&flag, "").unwrap();

        let resolved = resolve_praat_path(
            Some(&flag),
            Some(PathBuf::from("/missing/env")),
            Some(Path::new("/missing/config")),
        )
        .unwrap();
        assert_eq!(resolved, flag);
    }

    #[test]
    fn env_wins_over_config() {
        let dir = TempDir::new().unwrap();
        let env = dir.path().join("env-praat");
        fs::write(&env, "").unwrap();

        let resolved =
            resolve_praat_path(None, Some(env.clone()), Some(Path::new("/missing/config")))
                .unwrap();
        assert_eq!(resolved, env);
    }

    #[test]
    fn missing_configured_path_is_not_found() {
        let err = resolve_praat_path(None, None, Some(Path::new("/missing/praat"))).unwrap_err();
        assert!(matches!(err, Error::PraatNotFound(ref p) if p == Path::new("/missing/praat")));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_default_path() {
        assert_eq!(default_praat_path().unwrap(), PathBuf::from("/usr/bin/praat"));
    }
}
