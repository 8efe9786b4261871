//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use praat_text::export::{json, matlab};
use praat_text::{AnnotationDocument, FormantTrack};
use tracing::{debug, info};

use super::args::{ExportArgs, FormantsArgs, ReportArgs, TextGridArgs};
use super::types::{ExportFormatArg, TextGridFormatArg};
use crate::config::{
    DEFAULT_MAX_FREQ, DEFAULT_N_FORMANTS, DEFAULT_TIME_STEP, DEFAULT_WINDOW_LENGTH,
    PraatkitConfig,
};
use crate::error::Error;
use crate::praat::{FormantRequest, Method, PraatRunner};

/// Execute the formants command
pub fn execute_formants(args: &FormantsArgs, config: &PraatkitConfig) -> Result<()> {
    let request = build_request(args, config)?;
    let praat = config.praat_path(args.praat.as_deref())?;

    let outcome = PraatRunner::new(praat)
        .run(&request)
        .context("failed to run Praat")?
        .into_success()?;
    info!(formant = %outcome.formant_path.display(), "Praat wrote Formant file");

    let output = export(&outcome.formant_path, &args.export)?;
    println!("{output}");
    Ok(())
}

/// Execute the report command
pub fn execute_report(args: &ReportArgs) -> Result<()> {
    let output = export(&args.file, &args.export)?;
    println!("{output}");
    Ok(())
}

/// Execute the textgrid command
pub fn execute_textgrid(args: &TextGridArgs) -> Result<()> {
    let document = AnnotationDocument::from_path(&args.file)
        .with_context(|| format!("failed to read TextGrid {}", args.file.display()))?;
    debug!(tiers = document.tier_count(), "Loaded TextGrid");

    match args.format {
        TextGridFormatArg::Matlab => print!("{}", matlab::textgrid_script(&document)),
        TextGridFormatArg::Json => println!("{}", json::to_string(&document)?),
    }
    Ok(())
}

/// Combines flags, config file and defaults into one analysis request.
pub(crate) fn build_request(
    args: &FormantsArgs,
    config: &PraatkitConfig,
) -> Result<FormantRequest, Error> {
    let analysis = &config.analysis;
    let method = match (args.method, analysis.method.as_deref()) {
        (Some(arg), _) => Method::from(arg),
        (None, Some(name)) => Method::from_name(name)
            .ok_or_else(|| Error::Config(format!("unknown analysis.method '{name}'")))?,
        (None, None) => Method::default(),
    };

    Ok(FormantRequest {
        sound: args.file.clone(),
        method,
        time_step: args
            .timestep
            .or(analysis.time_step)
            .unwrap_or(DEFAULT_TIME_STEP),
        n_formants: args
            .nformants
            .or(analysis.n_formants)
            .unwrap_or(DEFAULT_N_FORMANTS),
        max_freq: args
            .maxfreq
            .or(analysis.max_freq)
            .unwrap_or(DEFAULT_MAX_FREQ),
        window_length: args
            .wlen
            .or(analysis.window_length)
            .unwrap_or(DEFAULT_WINDOW_LENGTH),
    })
}

/// Loads `formant_path` and renders it as requested; returns what to print.
pub(crate) fn export(formant_path: &Path, options: &ExportArgs) -> Result<String> {
    if options.export == ExportFormatArg::None {
        return Ok(formant_path.display().to_string());
    }

    let mut track = FormantTrack::new();
    track
        .load_praat_text(formant_path)
        .with_context(|| format!("failed to read Formant file {}", formant_path.display()))?;

    let output = match options.export {
        ExportFormatArg::None => formant_path.display().to_string(),
        ExportFormatArg::MatlabLiteral => track.to_matlab_literal()?,
        ExportFormatArg::Json => track.to_json()?,
        ExportFormatArg::MatFile => {
            let target = export_target(formant_path, options);
            track
                .write_mat_file(&target)
                .with_context(|| format!("failed to write {}", target.display()))?;
            target.display().to_string()
        }
        ExportFormatArg::JsonFile => {
            let target = export_target(formant_path, options);
            track
                .write_json_file(&target)
                .with_context(|| format!("failed to write {}", target.display()))?;
            target.display().to_string()
        }
    };
    debug!(format = %options.export, "Exported Formant report");
    Ok(output)
}

/// `--exportfile`, or the Formant path with the format's extension appended.
fn export_target(formant_path: &Path, options: &ExportArgs) -> PathBuf {
    if let Some(path) = &options.exportfile {
        return path.clone();
    }
    let mut name = formant_path.as_os_str().to_owned();
    if let Some(extension) = options.export.default_extension() {
        name.push(".");
        name.push(extension);
    }
    PathBuf::from(name)
}
