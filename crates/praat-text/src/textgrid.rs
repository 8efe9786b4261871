//! Praat TextGrid parsing (long text format).
//!
//! A TextGrid is a list of tiers, each a list of labeled time intervals:
//!
//! ```text
//! File type = "ooTextFile"
//! Object class = "TextGrid"
//!
//! xmin = 0
//! xmax = 1.25
//! tiers? <exists>
//! size = 1
//! item []:
//!     item [1]:
//!         class = "IntervalTier"
//!         name = "vowels"
//!         xmin = 0
//!         xmax = 1.25
//!         intervals: size = 1
//!         intervals [1]:
//!             xmin = 0
//!             xmax = 1.25
//!             text = "ah"
//! ```
//!
//! Parsing validates the object class, reads the declared tier count, locates
//! every `item [k]:` marker and then collects the `intervals [n]:` blocks of
//! each tier. The index inside `intervals [n]:` is not checked: blocks are
//! kept in the order they appear, duplicates included.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cursor::{LineCursor, LineMatch, LineMatcher, Prefix};
use crate::error::{FormatError, Result};
use crate::source;
use crate::warning::{self, Warning, WarningCollector};

/// The object class line every TextGrid must carry.
pub const OBJECT_CLASS_HEADER: &str = "Object class = \"TextGrid\"";

/// Lines in an interval block after its `intervals [n]:` header.
const INTERVAL_FIELD_LINES: usize = 3;

static SIZE: LazyLock<Regex> = LazyLock::new(|| field_regex("size"));
static TIER_CLASS: LazyLock<Regex> = LazyLock::new(|| field_regex("class"));
static TIER_NAME: LazyLock<Regex> = LazyLock::new(|| field_regex("name"));
static XMIN: LazyLock<Regex> = LazyLock::new(|| field_regex("xmin"));
static XMAX: LazyLock<Regex> = LazyLock::new(|| field_regex("xmax"));
static TEXT: LazyLock<Regex> = LazyLock::new(|| field_regex("text"));
static INTERVAL_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*intervals\s*\[[0-9]+\]\s*:").expect("interval header pattern is valid")
});

fn field_regex(keyword: &str) -> Regex {
    Regex::new(&format!(r"^\s*{keyword}\s*=\s*(.*?)\s*$")).expect("field pattern is valid")
}

/// A labeled time span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Start time in seconds.
    pub xmin: f64,
    /// End time in seconds.
    pub xmax: f64,
    /// Label, without its surrounding quotes.
    pub text: String,
}

/// One tier of a TextGrid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    name: Option<String>,
    class: Option<String>,
    intervals: Vec<Interval>,
}

impl Tier {
    /// The tier name, if the tier header declares one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The tier class (`IntervalTier`, `TextTier`), if declared.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Intervals in source order.
    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }
}

/// A parsed TextGrid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    tiers: Vec<Tier>,
}

impl AnnotationDocument {
    /// Parses decoded lines, logging any warnings.
    ///
    /// # Errors
    ///
    /// See [`parse_with_warnings`](Self::parse_with_warnings).
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let (document, warnings) = Self::parse_with_warnings(lines)?;
        warning::log_all("TextGrid", &warnings);
        Ok(document)
    }

    /// Parses decoded lines and returns the document with any warnings.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if:
    /// - the `Object class` line is missing or is not `Object class = "TextGrid"`
    /// - the `size = ` line is missing or not a non-negative integer
    /// - fewer `item [k]:` markers exist than the declared size
    /// - an interval block is cut short or its fields are malformed
    pub fn parse_with_warnings<S: AsRef<str>>(lines: &[S]) -> Result<(Self, Vec<Warning>)> {
        let mut cursor = LineCursor::new(lines);
        let mut warnings = WarningCollector::new();

        check_object_class(&mut cursor)?;
        let tier_count = read_tier_count(&mut cursor)?;

        // Marker positions; the end of input closes the last tier.
        let mut markers = Vec::with_capacity(tier_count.min(cursor.len()) + 1);
        for item in 1..=tier_count {
            let marker = format!("item [{item}]:");
            let found = cursor.require(&Prefix(&marker), &marker)?;
            markers.push(found.index);
        }
        markers.push(cursor.len());

        let mut tiers = Vec::with_capacity(tier_count);
        for bounds in markers.windows(2) {
            tiers.push(read_tier(&cursor, bounds[0] + 1, bounds[1], &mut warnings)?);
        }

        debug!(
            tiers = tiers.len(),
            intervals = tiers.iter().map(|t| t.intervals.len()).sum::<usize>(),
            "Parsed TextGrid"
        );
        Ok((Self { tiers }, warnings.into_warnings()))
    }

    /// Parses a whole TextGrid held in memory.
    ///
    /// # Errors
    ///
    /// See [`parse_with_warnings`](Self::parse_with_warnings).
    pub fn parse_str(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();
        Self::parse(&lines)
    }

    /// Reads and parses a TextGrid file (UTF-8 or UTF-16).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading TextGrid");
        let lines = source::read_lines(path)?;
        Self::parse(&lines)
    }

    /// Number of tiers; equals the declared `size`.
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Tiers in declaration order.
    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

fn check_object_class<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<()> {
    let Some(found) = cursor.next_match(&Prefix("Object class")) else {
        return Err(FormatError::HeaderMismatch {
            line_number: 1,
            expected: OBJECT_CLASS_HEADER,
            found: cursor.line(0).unwrap_or_default().trim().to_string(),
        }
        .into());
    };
    let content = cursor.line(found.index).unwrap_or_default().trim();
    if content != OBJECT_CLASS_HEADER {
        return Err(FormatError::HeaderMismatch {
            line_number: found.line_number(),
            expected: OBJECT_CLASS_HEADER,
            found: content.to_string(),
        }
        .into());
    }
    Ok(())
}

fn read_tier_count<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>) -> Result<usize> {
    let found = cursor.require(&*SIZE, "size")?;
    let raw = found.capture(0).unwrap_or_default();
    raw.parse().map_err(|_| {
        FormatError::InvalidNumber {
            field: "size".to_string(),
            line_number: found.line_number(),
            value: raw.to_string(),
        }
        .into()
    })
}

/// Reads the tier spanning `start..end`.
fn read_tier<S: AsRef<str>>(
    cursor: &LineCursor<'_, S>,
    start: usize,
    end: usize,
    warnings: &mut WarningCollector,
) -> Result<Tier> {
    // Tier attributes live between the item marker and the first interval.
    let body = cursor
        .find_within(&*INTERVAL_HEADER, start, end)
        .map_or(end, |m| m.index);
    let attribute = |re: &Regex| {
        cursor
            .find_within(re, start, body)
            .and_then(|m| m.capture(0))
            .map(|value| unquote(value).to_string())
    };
    let name = attribute(&*TIER_NAME);
    let class = attribute(&*TIER_CLASS);

    let mut intervals = Vec::new();
    let mut next = start;
    while let Some(header) = cursor.find_within(&*INTERVAL_HEADER, next, end) {
        let interval = read_interval(cursor, &header)?;
        if interval.xmin > interval.xmax {
            warnings.add(Warning::InvertedInterval {
                line_number: header.line_number(),
                xmin: interval.xmin,
                xmax: interval.xmax,
            });
        }
        intervals.push(interval);
        next = header.index + 1 + INTERVAL_FIELD_LINES;
    }

    Ok(Tier {
        name,
        class,
        intervals,
    })
}

fn read_interval<S: AsRef<str>>(
    cursor: &LineCursor<'_, S>,
    header: &LineMatch<'_>,
) -> Result<Interval> {
    if header.index + INTERVAL_FIELD_LINES >= cursor.len() {
        return Err(FormatError::TruncatedRecord {
            record: "intervals",
            line_number: header.line_number(),
        }
        .into());
    }

    let xmin = interval_field(cursor, header, 1, &*XMIN, "xmin")?.number("xmin")?;
    let xmax = interval_field(cursor, header, 2, &*XMAX, "xmax")?.number("xmax")?;
    let text = interval_field(cursor, header, 3, &*TEXT, "text")?
        .capture(0)
        .map(unquote)
        .unwrap_or_default()
        .to_string();

    Ok(Interval { xmin, xmax, text })
}

/// Matches the line `offset` lines below an interval header.
fn interval_field<'a, S: AsRef<str>>(
    cursor: &LineCursor<'a, S>,
    header: &LineMatch<'_>,
    offset: usize,
    matcher: &dyn LineMatcher,
    field: &str,
) -> std::result::Result<LineMatch<'a>, FormatError> {
    let index = header.index + offset;
    cursor
        .find_within(matcher, index, index + 1)
        .ok_or_else(|| FormatError::FieldNotFound {
            field: field.to_string(),
            line_number: header.line_number(),
        })
}

/// Removes one layer of surrounding double quotes.
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
