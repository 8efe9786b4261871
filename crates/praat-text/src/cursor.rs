//! Forward-only scanning over a decoded line buffer.
//!
//! Both Praat dialects are parsed the same way: search forward from the
//! current position for the next line matching a pattern, read its captured
//! value, and continue from just after it. [`LineCursor`] owns that position
//! and guarantees it only ever moves forward, which is what keeps the two
//! parsers single-pass.
//!
//! # Examples
//!
//! ```
//! use praat_text::cursor::{LineCursor, Prefix};
//! use regex::Regex;
//!
//! let lines = ["xmin = 0", "xmax = 1.5", "size = 2"];
//! let mut cursor = LineCursor::new(&lines);
//!
//! let xmax = Regex::new(r"^\s*xmax\s*=\s*(\S+)").unwrap();
//! let found = cursor.require(&xmax, "xmax").unwrap();
//! assert_eq!(found.index, 1);
//! assert_eq!(found.number("xmax").unwrap(), 1.5);
//! assert_eq!(cursor.position(), 2);
//!
//! // Earlier lines are never revisited.
//! assert!(cursor.next_match(&Prefix("xmin")).is_none());
//! ```

use regex::Regex;

use crate::error::FormatError;

/// Something that can recognise a line and extract values from it.
pub trait LineMatcher {
    /// Returns the captured groups if `line` matches, in pattern order and
    /// without the whole-match group. Matchers without groups return an
    /// empty vector on a match.
    fn match_line<'l>(&self, line: &'l str) -> Option<Vec<&'l str>>;
}

impl LineMatcher for Regex {
    fn match_line<'l>(&self, line: &'l str) -> Option<Vec<&'l str>> {
        let caps = self.captures(line)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map_or("", |m| m.as_str()))
                .collect(),
        )
    }
}

/// Matches lines that start with a literal, ignoring leading indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix<'p>(pub &'p str);

impl LineMatcher for Prefix<'_> {
    fn match_line<'l>(&self, line: &'l str) -> Option<Vec<&'l str>> {
        line.trim_start().starts_with(self.0).then(Vec::new)
    }
}

/// A successful line search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch<'a> {
    /// Zero-based index of the matched line.
    pub index: usize,
    /// Captured groups, first group at position 0.
    pub captures: Vec<&'a str>,
}

impl<'a> LineMatch<'a> {
    /// 1-based line number, for messages.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.index + 1
    }

    /// Returns captured group `n` (zero-based).
    #[must_use]
    pub fn capture(&self, n: usize) -> Option<&'a str> {
        self.captures.get(n).copied()
    }

    /// Parses the first captured group as a float.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidNumber`] if the group is absent or is not
    /// a finite decimal number. `inf`, `NaN` and Praat's `--undefined--` are
    /// all rejected.
    pub fn number(&self, field: &str) -> Result<f64, FormatError> {
        let raw = self.capture(0).unwrap_or_default().trim();
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| FormatError::InvalidNumber {
                field: field.to_string(),
                line_number: self.line_number(),
                value: raw.to_string(),
            })
    }
}

/// Cursor over an immutable slice of lines with a forward-only position.
#[derive(Debug, Clone)]
pub struct LineCursor<'a, S> {
    lines: &'a [S],
    position: usize,
}

impl<'a, S: AsRef<str>> LineCursor<'a, S> {
    /// Creates a cursor positioned at the first line.
    #[must_use]
    pub fn new(lines: &'a [S]) -> Self {
        Self { lines, position: 0 }
    }

    /// Zero-based index of the next line a search will start from.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if there are no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line at `index`, if any.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&'a str> {
        let lines: &'a [S] = self.lines;
        lines.get(index).map(AsRef::as_ref)
    }

    /// Finds the first line at or after `from` accepted by `matcher`.
    ///
    /// Does not move the cursor.
    pub fn find_forward<M>(&self, matcher: &M, from: usize) -> Option<LineMatch<'a>>
    where
        M: LineMatcher + ?Sized,
    {
        self.find_within(matcher, from, self.lines.len())
    }

    /// Like [`find_forward`](Self::find_forward) but stops before `until`.
    pub fn find_within<M>(&self, matcher: &M, from: usize, until: usize) -> Option<LineMatch<'a>>
    where
        M: LineMatcher + ?Sized,
    {
        let lines: &'a [S] = self.lines;
        let until = until.min(lines.len());
        (from..until).find_map(|index| {
            matcher
                .match_line(lines[index].as_ref())
                .map(|captures| LineMatch { index, captures })
        })
    }

    /// Searches from the current position; on success the cursor moves to
    /// just after the matched line.
    pub fn next_match<M>(&mut self, matcher: &M) -> Option<LineMatch<'a>>
    where
        M: LineMatcher + ?Sized,
    {
        let found = self.find_forward(matcher, self.position)?;
        self.position = found.index + 1;
        Some(found)
    }

    /// Like [`next_match`](Self::next_match) but a miss is an error naming
    /// `field`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::FieldNotFound`] if no line up to the end of the
    /// input matches.
    pub fn require<M>(&mut self, matcher: &M, field: &str) -> Result<LineMatch<'a>, FormatError>
    where
        M: LineMatcher + ?Sized,
    {
        self.require_before(matcher, self.lines.len(), field)
    }

    /// Like [`require`](Self::require) but the match must lie before `until`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::FieldNotFound`] if no line in
    /// `position..until` matches.
    pub fn require_before<M>(
        &mut self,
        matcher: &M,
        until: usize,
        field: &str,
    ) -> Result<LineMatch<'a>, FormatError>
    where
        M: LineMatcher + ?Sized,
    {
        let found = self
            .find_within(matcher, self.position, until)
            .ok_or_else(|| FormatError::FieldNotFound {
                field: field.to_string(),
                line_number: self.position,
            })?;
        self.position = found.index + 1;
        Ok(found)
    }

    /// Moves the cursor to `index`. Positions behind the cursor are ignored.
    pub fn advance_to(&mut self, index: usize) {
        self.position = self.position.max(index.min(self.lines.len()));
    }
}
