//! Praatkit - formant extraction through Praat.
//!
//! This crate provides both the `praatkit` CLI and a library for running
//! Praat's formant analysis and exporting the results. Parsing of Praat's
//! text files lives in the `praat-text` crate.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod praat;

// Public CLI module (needed by binary)
pub mod cli;

pub use error::{Error, Result};
