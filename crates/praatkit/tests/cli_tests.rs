//! Integration tests for the praatkit CLI.
//!
//! These tests run the built binary against files in temporary directories.
//! Praat itself is replaced by a shell script on Unix.

use std::fs;

use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{
    FORMANT_REPORT, TEXTGRID, run_praatkit_in_dir, run_praatkit_with_env, stderr, stdout,
    write_file,
};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides a directory holding `vowel.formant` and `vowel.TextGrid`
#[fixture]
fn data_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write_file(temp.path(), "vowel.formant", FORMANT_REPORT);
    write_file(temp.path(), "vowel.TextGrid", TEXTGRID);
    temp
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn test_cli_help(temp_dir: TempDir) {
    let output = run_praatkit_in_dir(temp_dir.path(), &["--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Usage:"));
    assert!(out.contains("formants"));
    assert!(out.contains("report"));
    assert!(out.contains("textgrid"));
}

#[rstest]
fn test_cli_version(temp_dir: TempDir) {
    let output = run_praatkit_in_dir(temp_dir.path(), &["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("0.1.0"));
}

#[rstest]
fn test_formants_help_lists_export_formats(temp_dir: TempDir) {
    let output = run_praatkit_in_dir(temp_dir.path(), &["formants", "--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    for format in ["none", "matlabliteral", "matfile", "json", "jsonfile"] {
        assert!(out.contains(format), "missing {format} in help");
    }
}

// ============================================================================
// Report Command Tests
// ============================================================================

#[rstest]
fn test_report_none_prints_path(data_dir: TempDir) {
    let output = run_praatkit_in_dir(data_dir.path(), &["report", "vowel.formant"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "vowel.formant");
}

#[rstest]
fn test_report_matlab_literal(data_dir: TempDir) {
    let output = run_praatkit_in_dir(
        data_dir.path(),
        &["report", "vowel.formant", "--export", "matlabliteral"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("struct('xmin',0.0,"));
    assert!(out.contains("'formants',[700.0,1200.0,NaN;NaN,1300.0,NaN]"));
    assert!(out.contains("'t',[0.005,0.015]"));
}

#[rstest]
fn test_report_json_uses_null_for_missing(data_dir: TempDir) {
    let output = run_praatkit_in_dir(
        data_dir.path(),
        &["report", "vowel.formant", "--export", "json"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["nx"], 2);
    assert_eq!(value["t"], serde_json::json!([0.005, 0.015]));
    assert!(value["formants"][1][0].is_null());
    assert_eq!(value["formants"][1][1], 1300.0);
    assert_eq!(value["bandwidths"][0][1], 90.0);
}

#[rstest]
#[case("matfile", "vowel.formant.mat")]
#[case("jsonfile", "vowel.formant.json")]
fn test_report_file_export_default_name(
    data_dir: TempDir,
    #[case] format: &str,
    #[case] expected: &str,
) {
    let output = run_praatkit_in_dir(
        data_dir.path(),
        &["report", "vowel.formant", "--export", format],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), expected);
    assert!(data_dir.path().join(expected).is_file());
}

#[rstest]
fn test_report_explicit_export_file(data_dir: TempDir) {
    let output = run_praatkit_in_dir(
        data_dir.path(),
        &[
            "report",
            "vowel.formant",
            "--export",
            "jsonfile",
            "--exportfile",
            "out.json",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "out.json");
    let written = fs::read_to_string(data_dir.path().join("out.json")).unwrap();
    assert!(written.contains("\"maxnFormants\": 3"));
}

#[rstest]
fn test_report_mat_file_header(data_dir: TempDir) {
    let output = run_praatkit_in_dir(
        data_dir.path(),
        &["report", "vowel.formant", "--export", "matfile"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let bytes = fs::read(data_dir.path().join("vowel.formant.mat")).unwrap();
    assert!(bytes.starts_with(b"MATLAB 5.0 MAT-file"));
    assert_eq!(&bytes[126..128], b"IM");
}

#[rstest]
fn test_report_missing_file_fails(temp_dir: TempDir) {
    let output = run_praatkit_in_dir(
        temp_dir.path(),
        &["report", "absent.formant", "--export", "json"],
    );
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error"));
    assert!(err.contains("absent.formant"));
}

#[rstest]
fn test_report_wrong_header_fails(temp_dir: TempDir) {
    write_file(temp_dir.path(), "bad.formant", TEXTGRID);
    let output = run_praatkit_in_dir(
        temp_dir.path(),
        &["report", "bad.formant", "--export", "json"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Formant 2"));
}

// ============================================================================
// TextGrid Command Tests
// ============================================================================

#[rstest]
fn test_textgrid_matlab_script(data_dir: TempDir) {
    let output = run_praatkit_in_dir(data_dir.path(), &["textgrid", "vowel.TextGrid"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        concat!(
            "x = struct();\n",
            "x.interval(1) = struct();\n",
            "x.interval(1).label(1).x = [0.000000, 0.500000];\n",
            "x.interval(1).label(1).text = 'ah';\n",
            "x.interval(1).label(2).x = [0.500000, 1.250000];\n",
            "x.interval(1).label(2).text = 'it''s';\n",
        )
    );
}

#[rstest]
fn test_textgrid_json(data_dir: TempDir) {
    let output = run_praatkit_in_dir(
        data_dir.path(),
        &["textgrid", "vowel.TextGrid", "--format", "json"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["tiers"][0]["name"], "vowels");
    assert_eq!(value["tiers"][0]["intervals"][1]["text"], "it's");
}

#[rstest]
fn test_textgrid_rejects_formant_file(data_dir: TempDir) {
    let output = run_praatkit_in_dir(data_dir.path(), &["textgrid", "vowel.formant"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read TextGrid"));
}

// ============================================================================
// Formants Command Tests
// ============================================================================

#[rstest]
#[case("--timestep")]
#[case("--wlen")]
#[case("--maxfreq")]
#[case("--nformants")]
fn test_formants_rejects_non_positive(temp_dir: TempDir, #[case] flag: &str) {
    let output = run_praatkit_in_dir(temp_dir.path(), &["formants", "a.wav", flag, "-1"]);
    assert!(!output.status.success());
}

#[rstest]
fn test_formants_missing_praat(temp_dir: TempDir) {
    let missing = temp_dir.path().join("no-praat-here");
    let output = run_praatkit_with_env(
        temp_dir.path(),
        &["formants", "a.wav"],
        &[("PRAATKIT_PRAAT", missing.as_path())],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("could not find Praat"));
}

#[rstest]
fn test_formants_bad_config_file(temp_dir: TempDir) {
    write_file(temp_dir.path(), ".praatkit.yaml", "analysis:\n  time-step: -1\n");
    let output = run_praatkit_in_dir(temp_dir.path(), &["formants", "a.wav"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("analysis.time-step"));
}

#[cfg(unix)]
mod fake_praat {
    use super::*;
    use common::install_fake_praat;

    fn writing_praat(dir: &std::path::Path) -> std::path::PathBuf {
        install_fake_praat(
            dir,
            &format!("echo \"$@\" > args.txt\ncat > \"$4\" <<'EOF'\n{FORMANT_REPORT}EOF"),
        )
    }

    #[rstest]
    fn test_formants_prints_formant_path(temp_dir: TempDir) {
        let praat = writing_praat(temp_dir.path());
        let output = run_praatkit_with_env(
            temp_dir.path(),
            &["formants", "vowel.wav"],
            &[("PRAATKIT_PRAAT", praat.as_path())],
        );
        assert!(output.status.success(), "{}", stderr(&output));
        assert_eq!(stdout(&output).trim(), "vowel.formant");
        assert!(temp_dir.path().join("vowel.formant").is_file());
    }

    #[rstest]
    fn test_formants_passes_analysis_parameters(temp_dir: TempDir) {
        let praat = writing_praat(temp_dir.path());
        let output = run_praatkit_with_env(
            temp_dir.path(),
            &["formants", "vowel.wav", "--maxfreq", "5000", "--nformants", "4"],
            &[("PRAATKIT_PRAAT", praat.as_path())],
        );
        assert!(output.status.success(), "{}", stderr(&output));

        let args = fs::read_to_string(temp_dir.path().join("args.txt")).unwrap();
        let args: Vec<&str> = args.split_whitespace().collect();
        assert_eq!(args[0], "--run");
        assert!(args[1].ends_with(".praat"));
        assert_eq!(
            &args[2..],
            ["vowel.wav", "vowel.formant", "burg", "0.00625", "4", "5000", "0.025"]
        );
    }

    #[rstest]
    fn test_formants_config_file_supplies_defaults(temp_dir: TempDir) {
        let praat = writing_praat(temp_dir.path());
        write_file(
            temp_dir.path(),
            "settings.yaml",
            &format!(
                "praat-path: {}\nanalysis:\n  time-step: 0.01\n",
                praat.display()
            ),
        );
        let output = run_praatkit_in_dir(
            temp_dir.path(),
            &["formants", "vowel.wav", "--config", "settings.yaml"],
        );
        assert!(output.status.success(), "{}", stderr(&output));

        let args = fs::read_to_string(temp_dir.path().join("args.txt")).unwrap();
        assert!(args.contains(" 0.01 "));
    }

    #[rstest]
    fn test_formants_then_matlab_literal(temp_dir: TempDir) {
        let praat = writing_praat(temp_dir.path());
        let output = run_praatkit_with_env(
            temp_dir.path(),
            &["formants", "vowel.wav", "--export", "matlabliteral"],
            &[("PRAATKIT_PRAAT", praat.as_path())],
        );
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(stdout(&output).contains("'maxnFormants',3,"));
    }

    #[rstest]
    fn test_formants_praat_failure(temp_dir: TempDir) {
        let praat = install_fake_praat(temp_dir.path(), "echo 'Cannot open sound' >&2\nexit 1");
        let output = run_praatkit_with_env(
            temp_dir.path(),
            &["formants", "vowel.wav"],
            &[("PRAATKIT_PRAAT", praat.as_path())],
        );
        assert!(!output.status.success());
        let err = stderr(&output);
        assert!(err.contains("formant extraction failed"));
        assert!(err.contains("Cannot open sound"));
    }
}
