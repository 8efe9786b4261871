//! Rendering parsed records for other tools.
//!
//! Every export is a pure function over a parsed record:
//!
//! - [`matlab`]: MATLAB source text (`struct(...)` literal, TextGrid script)
//! - [`mat`]: level 5 MAT-file bytes
//! - [`json`]: JSON documents that load back into the same records
//!
//! Missing formant slots become `NaN` in the MATLAB outputs and `null` in JSON.

mod atomic;
pub mod json;
pub mod mat;
pub mod matlab;

pub use atomic::write_atomic;
