//! Reading Praat text files into decoded lines.
//!
//! Praat saves text files as UTF-8 when they are plain ASCII and as UTF-16
//! (with a byte order mark) as soon as a label contains anything else, so a
//! reader has to accept both. The whole file is read up front; the parsers
//! then work on the resulting line buffer.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Reads `path` and splits it into lines.
///
/// # Errors
///
/// Returns an IO error if the file cannot be read or is not valid UTF-8 /
/// UTF-16 text.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let text = decode(&bytes)?;
    Ok(split_lines(&text))
}

/// Decodes raw file bytes, honouring a leading byte order mark.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidData`] for malformed text.
pub fn decode(bytes: &[u8]) -> io::Result<String> {
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    let rest = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8(rest.to_vec()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> io::Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "UTF-16 text has an odd number of bytes",
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Splits on `\n`, dropping a trailing `\r` from each line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(String::from).collect()
}
