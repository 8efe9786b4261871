//! Readers for Praat's long text formats.
//!
//! This library parses two kinds of files written by the Praat phonetics
//! program:
//!
//! - TextGrid annotations ([`AnnotationDocument`]): tiers of labeled time
//!   intervals
//! - Formant analysis reports ([`FormantReport`]): per-frame formant
//!   frequencies and bandwidths, with empty slots where Praat found fewer
//!   formants than the maximum
//!
//! Parsed records can be rendered for MATLAB (a `struct(...)` literal, a
//! script, or a level 5 MAT-file) or serialized as JSON; see [`export`].
//!
//! # Example
//!
//! ```
//! use praat_text::AnnotationDocument;
//!
//! let document = AnnotationDocument::parse_str(concat!(
//!     "File type = \"ooTextFile\"\n",
//!     "Object class = \"TextGrid\"\n",
//!     "size = 1\n",
//!     "item []:\n",
//!     "    item [1]:\n",
//!     "        intervals [1]:\n",
//!     "            xmin = 0\n",
//!     "            xmax = 1.25\n",
//!     "            text = \"ah\"\n",
//! ))?;
//!
//! let interval = &document.tiers()[0].intervals()[0];
//! assert_eq!(interval.text, "ah");
//! assert_eq!(interval.xmax, 1.25);
//! # Ok::<(), praat_text::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cursor;
pub mod error;
pub mod export;
pub mod formant;
pub mod source;
pub mod textgrid;
pub mod warning;

pub use error::{Error, FormatError, Result};
pub use formant::{Frame, FormantReport, FormantTrack, ReportDocument};
pub use textgrid::{AnnotationDocument, Interval, Tier};
pub use warning::{Warning, WarningCollector};
