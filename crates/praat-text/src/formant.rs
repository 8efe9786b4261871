//! Praat Formant report parsing (`Formant 2`, long text format).
//!
//! A report is what Praat's `Write to text file...` produces for a Formant
//! object:
//!
//! ```text
//! File type = "ooTextFile"
//! Object class = "Formant 2"
//!
//! xmin = 0
//! xmax = 0.5
//! nx = 97
//! dx = 0.005
//! x1 = 0.01
//! maxnFormants = 5
//! frames []:
//!     frames [1]:
//!         intensity = 0.0012
//!         numberOfFormants = 4
//!         formant []:
//!             formant [1]:
//!                 frequency = 612.3
//!                 bandwidth = 80.2
//!             formant [2]:
//!                 ...
//! ```
//!
//! Each frame carries a variable number of `formant [k]:` records. They are
//! spread into fixed-width rows of `maxnFormants` slots, slot `k - 1` for
//! record `k`; slots without a record stay `None`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cursor::{LineCursor, LineMatch};
use crate::error::{Error, FormatError, Result};
use crate::export;
use crate::source;
use crate::warning::{self, Warning, WarningCollector};

/// Required first line of a Praat text file.
pub const FILE_TYPE_HEADER: &str = "File type = \"ooTextFile\"";

/// Required second line of a Formant report.
pub const OBJECT_CLASS_HEADER: &str = "Object class = \"Formant 2\"";

/// Largest `maxnFormants` a report may declare.
///
/// Every frame row is allocated at this width, so larger values are rejected
/// as [`FormatError::InvalidNumber`].
pub const MAX_FORMANT_SLOTS: usize = 100;

static XMIN: LazyLock<Regex> = LazyLock::new(|| number_regex("xmin"));
static XMAX: LazyLock<Regex> = LazyLock::new(|| number_regex("xmax"));
static NX: LazyLock<Regex> = LazyLock::new(|| number_regex("nx"));
static DX: LazyLock<Regex> = LazyLock::new(|| number_regex("dx"));
static X1: LazyLock<Regex> = LazyLock::new(|| number_regex("x1"));
static MAX_FORMANTS: LazyLock<Regex> = LazyLock::new(|| number_regex("maxnFormants"));
static INTENSITY: LazyLock<Regex> = LazyLock::new(|| number_regex("intensity"));
static FREQUENCY: LazyLock<Regex> = LazyLock::new(|| number_regex("frequency"));
static BANDWIDTH: LazyLock<Regex> = LazyLock::new(|| number_regex("bandwidth"));
static FRAMES_ARRAY: LazyLock<Regex> = LazyLock::new(|| marker_regex("frames", ""));
static FRAME: LazyLock<Regex> = LazyLock::new(|| marker_regex("frames", "([0-9]+)"));
static FORMANT_ARRAY: LazyLock<Regex> = LazyLock::new(|| marker_regex("formant", ""));
static FORMANT: LazyLock<Regex> = LazyLock::new(|| marker_regex("formant", "([0-9]+)"));

fn number_regex(keyword: &str) -> Regex {
    Regex::new(&format!(r"^\s*{keyword}\s*=\s*(\S+)")).expect("number pattern is valid")
}

fn marker_regex(keyword: &str, index: &str) -> Regex {
    Regex::new(&format!(r"^\s*{keyword}\s*\[\s*{index}\s*\]\s*:")).expect("marker pattern is valid")
}

/// One analysis frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    time: f64,
    intensity: f64,
    formants: Vec<Option<f64>>,
    bandwidths: Vec<Option<f64>>,
}

impl Frame {
    /// Frame centre in seconds, `x1 + j * dx` for frame `j`.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Frame intensity as written by Praat.
    #[must_use]
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Formant frequencies (Hz), one slot per possible formant.
    #[must_use]
    pub fn formants(&self) -> &[Option<f64>] {
        &self.formants
    }

    /// Bandwidths (Hz), aligned with [`formants`](Self::formants).
    #[must_use]
    pub fn bandwidths(&self) -> &[Option<f64>] {
        &self.bandwidths
    }

    /// Frequency and bandwidth of formant `number` (1-based: F1, F2, ...).
    #[must_use]
    pub fn formant(&self, number: usize) -> Option<(f64, f64)> {
        let slot = number.checked_sub(1)?;
        let frequency = (*self.formants.get(slot)?)?;
        let bandwidth = (*self.bandwidths.get(slot)?)?;
        Some((frequency, bandwidth))
    }

    /// Number of slots holding a formant.
    #[must_use]
    pub fn num_formants(&self) -> usize {
        self.formants.iter().filter(|f| f.is_some()).count()
    }
}

/// A parsed Formant report.
///
/// Serializes as [`ReportDocument`]: header scalars plus the per-frame
/// columns `t`, `formants`, `bandwidths` and `intensity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ReportDocument", try_from = "ReportDocument")]
pub struct FormantReport {
    xmin: f64,
    xmax: f64,
    nx: usize,
    dx: f64,
    x1: f64,
    max_formants: usize,
    frames: Vec<Frame>,
}

/// Column layout of a [`FormantReport`], the shape used by every export.
///
/// `formants` and `bandwidths` are `frames x maxnFormants`; missing slots are
/// `None` (`null` in JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Start of the time domain (s).
    pub xmin: f64,
    /// End of the time domain (s).
    pub xmax: f64,
    /// Declared frame count.
    pub nx: usize,
    /// Frame step (s).
    pub dx: f64,
    /// Time of the first frame (s).
    pub x1: f64,
    /// Slots per frame.
    #[serde(rename = "maxnFormants")]
    pub max_formants: usize,
    /// Frame times.
    pub t: Vec<f64>,
    /// Formant frequencies, one row per frame.
    pub formants: Vec<Vec<Option<f64>>>,
    /// Bandwidths, one row per frame.
    pub bandwidths: Vec<Vec<Option<f64>>>,
    /// Frame intensities.
    pub intensity: Vec<f64>,
}

impl From<FormantReport> for ReportDocument {
    fn from(report: FormantReport) -> Self {
        let frames = report.frames;
        Self {
            xmin: report.xmin,
            xmax: report.xmax,
            nx: report.nx,
            dx: report.dx,
            x1: report.x1,
            max_formants: report.max_formants,
            t: frames.iter().map(|f| f.time).collect(),
            intensity: frames.iter().map(|f| f.intensity).collect(),
            formants: frames.iter().map(|f| f.formants.clone()).collect(),
            bandwidths: frames.into_iter().map(|f| f.bandwidths).collect(),
        }
    }
}

impl TryFrom<ReportDocument> for FormantReport {
    type Error = String;

    fn try_from(document: ReportDocument) -> std::result::Result<Self, Self::Error> {
        let frame_count = document.t.len();
        for (column, len) in [
            ("formants", document.formants.len()),
            ("bandwidths", document.bandwidths.len()),
            ("intensity", document.intensity.len()),
        ] {
            if len != frame_count {
                return Err(format!("'{column}' has {len} rows but 't' has {frame_count}"));
            }
        }
        let width = document.max_formants;
        if let Some(row) = document
            .formants
            .iter()
            .chain(&document.bandwidths)
            .find(|row| row.len() != width)
        {
            return Err(format!(
                "a row has {} slots but maxnFormants = {width}",
                row.len()
            ));
        }

        let frames = document
            .t
            .into_iter()
            .zip(document.intensity)
            .zip(document.formants.into_iter().zip(document.bandwidths))
            .map(|((time, intensity), (formants, bandwidths))| Frame {
                time,
                intensity,
                formants,
                bandwidths,
            })
            .collect();

        Ok(Self {
            xmin: document.xmin,
            xmax: document.xmax,
            nx: document.nx,
            dx: document.dx,
            x1: document.x1,
            max_formants: width,
            frames,
        })
    }
}

impl FormantReport {
    /// Parses decoded lines, logging any warnings.
    ///
    /// # Errors
    ///
    /// See [`parse_with_warnings`](Self::parse_with_warnings).
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let (report, warnings) = Self::parse_with_warnings(lines)?;
        warning::log_all("Formant", &warnings);
        Ok(report)
    }

    /// Parses decoded lines and returns the report with any warnings.
    ///
    /// A file that ends on a frame boundary before `nx` frames is accepted;
    /// the shortfall is reported as [`Warning::FrameCountMismatch`].
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if:
    /// - the first two lines are not the `ooTextFile` / `Formant 2` headers
    /// - a header scalar, `frames []:`, or a frame's `intensity` is missing
    /// - a formant record lacks its `frequency` or `bandwidth`
    /// - a value is not a number
    pub fn parse_with_warnings<S: AsRef<str>>(lines: &[S]) -> Result<(Self, Vec<Warning>)> {
        let mut cursor = LineCursor::new(lines);
        let mut warnings = WarningCollector::new();

        check_header(&cursor, 0, FILE_TYPE_HEADER)?;
        check_header(&cursor, 1, OBJECT_CLASS_HEADER)?;
        cursor.advance_to(2);

        let xmin = cursor.require(&*XMIN, "xmin")?.number("xmin")?;
        let xmax = cursor.require(&*XMAX, "xmax")?.number("xmax")?;
        let nx = count(&cursor.require(&*NX, "nx")?, "nx")?;
        let dx = cursor.require(&*DX, "dx")?.number("dx")?;
        let x1 = cursor.require(&*X1, "x1")?.number("x1")?;
        let max_formants = slot_count(&cursor.require(&*MAX_FORMANTS, "maxnFormants")?)?;
        debug!(xmin, xmax, nx, dx, x1, max_formants, "Read Formant header");

        cursor.require(&*FRAMES_ARRAY, "frames []")?;

        let mut frames = Vec::with_capacity(nx.min(cursor.len()));
        while let Some(marker) = cursor.next_match(&*FRAME) {
            let time = frame_time(x1, dx, frames.len());
            let frame = read_frame(&mut cursor, &marker, time, max_formants, &mut warnings)?;
            frames.push(frame);
        }

        if frames.len() != nx {
            warnings.add(Warning::FrameCountMismatch {
                declared: nx,
                found: frames.len(),
            });
        }
        debug!(frames = frames.len(), "Parsed Formant report");

        let report = Self {
            xmin,
            xmax,
            nx,
            dx,
            x1,
            max_formants,
            frames,
        };
        Ok((report, warnings.into_warnings()))
    }

    /// Parses a whole report held in memory.
    ///
    /// # Errors
    ///
    /// See [`parse_with_warnings`](Self::parse_with_warnings).
    pub fn parse_str(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();
        Self::parse(&lines)
    }

    /// Reads and parses a Formant report file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading Formant report");
        let lines = source::read_lines(path)?;
        Self::parse(&lines)
    }

    /// Start of the analysed time domain (s).
    #[must_use]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// End of the analysed time domain (s).
    #[must_use]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Declared frame count.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Frame step (s).
    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Time of the first frame (s).
    #[must_use]
    pub fn x1(&self) -> f64 {
        self.x1
    }

    /// Slots per frame.
    #[must_use]
    pub fn max_formants(&self) -> usize {
        self.max_formants
    }

    /// Frames in file order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

fn check_header<S: AsRef<str>>(
    cursor: &LineCursor<'_, S>,
    index: usize,
    expected: &'static str,
) -> std::result::Result<(), FormatError> {
    let found = cursor.line(index).unwrap_or_default().trim();
    if found == expected {
        Ok(())
    } else {
        Err(FormatError::HeaderMismatch {
            line_number: index + 1,
            expected,
            found: found.to_string(),
        })
    }
}

/// Integer fields are written as numbers and truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count(found: &LineMatch<'_>, field: &str) -> std::result::Result<usize, FormatError> {
    let value = found.number(field)?;
    if !value.is_finite() || value < 0.0 {
        return Err(FormatError::InvalidNumber {
            field: field.to_string(),
            line_number: found.line_number(),
            value: found.capture(0).unwrap_or_default().to_string(),
        });
    }
    Ok(value as usize)
}

fn slot_count(found: &LineMatch<'_>) -> std::result::Result<usize, FormatError> {
    let slots = count(found, "maxnFormants")?;
    if slots > MAX_FORMANT_SLOTS {
        return Err(FormatError::InvalidNumber {
            field: "maxnFormants".to_string(),
            line_number: found.line_number(),
            value: found.capture(0).unwrap_or_default().to_string(),
        });
    }
    Ok(slots)
}

#[allow(clippy::cast_precision_loss)]
fn frame_time(x1: f64, dx: f64, frame: usize) -> f64 {
    x1 + frame as f64 * dx
}

/// Reads the frame whose marker was just consumed.
fn read_frame<S: AsRef<str>>(
    cursor: &mut LineCursor<'_, S>,
    marker: &LineMatch<'_>,
    time: f64,
    max_formants: usize,
    warnings: &mut WarningCollector,
) -> Result<Frame> {
    // The next frame marker (or the end of input) closes this frame.
    let end = cursor
        .find_forward(&*FRAME, marker.index + 1)
        .map_or(cursor.len(), |m| m.index);
    trace!(
        frame = marker.capture(0).unwrap_or_default(),
        line = marker.line_number(),
        end,
        "Reading frame"
    );

    let intensity = cursor
        .require_before(&*INTENSITY, end, "intensity")?
        .number("intensity")?;

    let mut formants = vec![None; max_formants];
    let mut bandwidths = vec![None; max_formants];

    if let Some(array) = cursor.find_within(&*FORMANT_ARRAY, cursor.position(), end) {
        cursor.advance_to(array.index + 1);
        while let Some(record) = cursor.find_forward(&*FORMANT, cursor.position()) {
            if record.index >= end {
                break;
            }
            cursor.advance_to(record.index + 1);
            let (frequency, bandwidth) = read_formant(cursor, &record, end)?;

            let index = index_of(&record)?;
            match index.checked_sub(1).filter(|slot| *slot < max_formants) {
                Some(slot) => {
                    formants[slot] = Some(frequency);
                    bandwidths[slot] = Some(bandwidth);
                }
                None => warnings.add(Warning::FormantIndexOutOfRange {
                    line_number: record.line_number(),
                    index,
                    max_formants,
                }),
            }
        }
    }
    cursor.advance_to(end);

    Ok(Frame {
        time,
        intensity,
        formants,
        bandwidths,
    })
}

/// Reads `frequency` and `bandwidth` from one `formant [k]:` record.
fn read_formant<S: AsRef<str>>(
    cursor: &mut LineCursor<'_, S>,
    record: &LineMatch<'_>,
    frame_end: usize,
) -> Result<(f64, f64)> {
    let record_end = cursor
        .find_within(&*FORMANT, record.index + 1, frame_end)
        .map_or(frame_end, |m| m.index);
    let frequency = cursor
        .require_before(&*FREQUENCY, record_end, "frequency")?
        .number("frequency")?;
    let bandwidth = cursor
        .require_before(&*BANDWIDTH, record_end, "bandwidth")?
        .number("bandwidth")?;
    Ok((frequency, bandwidth))
}

fn index_of(record: &LineMatch<'_>) -> std::result::Result<usize, FormatError> {
    let raw = record.capture(0).unwrap_or_default();
    raw.parse().map_err(|_| FormatError::InvalidNumber {
        field: "formant".to_string(),
        line_number: record.line_number(),
        value: raw.to_string(),
    })
}

/// A formant report that may not have been loaded yet.
///
/// Exports go through this holder; on an empty holder they fail with
/// [`Error::State`].
///
/// # Examples
///
/// ```
/// use praat_text::formant::FormantTrack;
///
/// let track = FormantTrack::new();
/// assert!(track.to_matlab_literal().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormantTrack {
    report: Option<FormantReport>,
}

impl FormantTrack {
    /// Creates an empty holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already parsed report.
    #[must_use]
    pub fn from_report(report: FormantReport) -> Self {
        Self {
            report: Some(report),
        }
    }

    /// Parses `lines` into this holder, replacing any previous report.
    ///
    /// On failure the holder is left empty.
    ///
    /// # Errors
    ///
    /// Returns the parse error.
    pub fn load_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<&FormantReport> {
        self.report = None;
        let report = FormantReport::parse(lines)?;
        Ok(self.report.insert(report))
    }

    /// Reads and parses a Praat Formant text file into this holder.
    ///
    /// # Errors
    ///
    /// Returns an IO or parse error; the holder is left empty.
    pub fn load_praat_text(&mut self, path: impl AsRef<Path>) -> Result<&FormantReport> {
        self.report = None;
        let report = FormantReport::from_path(path)?;
        Ok(self.report.insert(report))
    }

    /// Returns `true` once a report has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.report.is_some()
    }

    /// The loaded report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if nothing has been loaded.
    pub fn report(&self) -> Result<&FormantReport> {
        self.report.as_ref().ok_or_else(|| {
            Error::State(
                "no formant data loaded; load a Praat Formant file before exporting".to_string(),
            )
        })
    }

    /// Renders the report as a MATLAB `struct(...)` expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if nothing has been loaded.
    pub fn to_matlab_literal(&self) -> Result<String> {
        Ok(export::matlab::formant_literal(self.report()?))
    }

    /// Encodes the report as a level 5 MAT-file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if nothing has been loaded.
    pub fn to_mat_bytes(&self) -> Result<Vec<u8>> {
        Ok(export::mat::encode_report(self.report()?))
    }

    /// Writes the report as a MAT-file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if nothing has been loaded, or an IO error.
    pub fn write_mat_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_mat_bytes()?;
        export::write_atomic(path, &bytes)
    }

    /// Serializes the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if nothing has been loaded.
    pub fn to_json(&self) -> Result<String> {
        export::json::to_string(self.report()?)
    }

    /// Writes the report as JSON at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::State`] if nothing has been loaded, or an IO error.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        export::write_atomic(path, json.as_bytes())
    }
}
