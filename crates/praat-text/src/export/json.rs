//! JSON export.
//!
//! Formant reports are written in their column layout
//! ([`ReportDocument`](crate::formant::ReportDocument)): the header scalars
//! followed by `t`, `formants`, `bandwidths` and `intensity`, the same names
//! and shapes as the MAT-file variables. Missing formant slots are `null`, so
//! a document read back with [`from_str`] compares equal to the record it came
//! from.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Serializes a record as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Reads a record back from JSON.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if the text is not valid JSON
/// for `T`.
pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(text)?)
}
