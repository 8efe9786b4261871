//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// A two-frame Formant report; the second frame only has F2.
pub const FORMANT_REPORT: &str = r#"File type = "ooTextFile"
Object class = "Formant 2"

xmin = 0
xmax = 0.02
nx = 2
dx = 0.01
x1 = 0.005
maxnFormants = 3
frames []:
    frames [1]:
        intensity = 0.5
        numberOfFormants = 2
        formant []:
            formant [1]:
                frequency = 700
                bandwidth = 80
            formant [2]:
                frequency = 1200
                bandwidth = 90
    frames [2]:
        intensity = 0.25
        numberOfFormants = 1
        formant []:
            formant [2]:
                frequency = 1300
                bandwidth = 95
"#;

/// A one-tier TextGrid with a quote in a label.
pub const TEXTGRID: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"

xmin = 0
xmax = 1.25
tiers? <exists>
size = 1
item []:
    item [1]:
        class = "IntervalTier"
        name = "vowels"
        xmin = 0
        xmax = 1.25
        intervals: size = 2
        intervals [1]:
            xmin = 0
            xmax = 0.5
            text = "ah"
        intervals [2]:
            xmin = 0.5
            xmax = 1.25
            text = "it's"
"#;

/// Path to the praatkit binary built for this test run
pub fn praatkit_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_praatkit"))
}

/// Run the praatkit binary in `dir` with a clean praatkit environment
pub fn run_praatkit_in_dir(dir: &Path, args: &[&str]) -> Output {
    run_praatkit_with_env(dir, args, &[])
}

/// Run the praatkit binary in `dir` with extra environment variables
pub fn run_praatkit_with_env(dir: &Path, args: &[&str], env: &[(&str, &Path)]) -> Output {
    let mut command = Command::new(praatkit_binary());
    command
        .args(args)
        .current_dir(dir)
        .env_remove("PRAATKIT_PRAAT")
        .env_remove("RUST_LOG");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("Failed to execute praatkit binary")
}

/// Write `contents` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Install an executable shell script standing in for Praat.
///
/// The script receives Praat's batch arguments:
/// `--run <script> <sound> <formant> <method> <timestep> <nformants> <maxfreq> <wlen>`.
#[cfg(unix)]
pub fn install_fake_praat(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-praat");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write fake Praat");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake Praat executable");
    path
}

/// Standard output as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Standard error as a string
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
