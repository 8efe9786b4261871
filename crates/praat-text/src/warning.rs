//! Non-fatal findings reported while parsing.
//!
//! Praat files produced by older releases or edited by hand are often a little
//! off without being unusable: a Formant file cut short on a frame boundary,
//! a formant slot index beyond the declared width, an interval whose bounds are
//! swapped. Such files still parse; the irregularities are reported as
//! [`Warning`]s so the caller can decide what to do with them.
//!
//! # Examples
//!
//! ```
//! use praat_text::warning::{Warning, WarningCollector};
//!
//! let mut collector = WarningCollector::new();
//! collector.add(Warning::FrameCountMismatch { declared: 10, found: 8 });
//!
//! let warnings = collector.into_warnings();
//! assert_eq!(warnings.len(), 1);
//! assert_eq!(warnings[0].kind(), "frame_count_mismatch");
//! ```

/// A non-fatal irregularity found in an otherwise valid file.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The number of frames found differs from the declared `nx`.
    FrameCountMismatch {
        /// Frame count declared in the header.
        declared: usize,
        /// Frames actually present.
        found: usize,
    },

    /// A `formant [k]:` record whose index does not fit the frame width.
    ///
    /// The record is skipped; the frame keeps its other slots.
    FormantIndexOutOfRange {
        /// The 1-based line number of the record header.
        line_number: usize,
        /// The index as written in the file (1-based).
        index: usize,
        /// The frame width (`maxnFormants`).
        max_formants: usize,
    },

    /// An interval whose `xmin` is greater than its `xmax`.
    InvertedInterval {
        /// The 1-based line number of the interval header.
        line_number: usize,
        /// Start time as read.
        xmin: f64,
        /// End time as read.
        xmax: f64,
    },
}

impl Warning {
    /// Returns the line number associated with this warning, if it has one.
    ///
    /// File-level warnings such as [`Warning::FrameCountMismatch`] have none.
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::FrameCountMismatch { .. } => None,
            Self::FormantIndexOutOfRange { line_number, .. }
            | Self::InvertedInterval { line_number, .. } => Some(*line_number),
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use praat_text::warning::Warning;
    ///
    /// let warning = Warning::FormantIndexOutOfRange {
    ///     line_number: 42,
    ///     index: 7,
    ///     max_formants: 5,
    /// };
    /// let desc = warning.description();
    /// assert!(desc.contains("line 42"));
    /// assert!(desc.contains("7"));
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::FrameCountMismatch { declared, found } => {
                format!("header declares {declared} frames but {found} were found")
            }
            Self::FormantIndexOutOfRange {
                line_number,
                index,
                max_formants,
            } => format!(
                "line {line_number}: formant index {index} outside 1..={max_formants}, record skipped"
            ),
            Self::InvertedInterval {
                line_number,
                xmin,
                xmax,
            } => format!("line {line_number}: interval xmin {xmin} is after xmax {xmax}"),
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FrameCountMismatch { .. } => "frame_count_mismatch",
            Self::FormantIndexOutOfRange { .. } => "formant_index_out_of_range",
            Self::InvertedInterval { .. } => "inverted_interval",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Accumulates warnings during one parse.
///
/// Parsing is single-threaded and each parse owns its collector, so this is a
/// plain ordered buffer.
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Vec<Warning>,
}

impl WarningCollector {
    /// Creates a new empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning, logging it at debug level.
    pub fn add(&mut self, warning: Warning) {
        tracing::debug!(kind = warning.kind(), "{}", warning);
        self.warnings.push(warning);
    }

    /// Returns the number of warnings collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Returns `true` if no warnings have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns the warnings collected so far, in the order they were found.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consumes the collector and returns all collected warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Logs each warning at warn level.
///
/// Used by the `parse` entry points that do not hand warnings back.
pub(crate) fn log_all(source: &str, warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!(source, kind = warning.kind(), "{}", warning);
    }
}
