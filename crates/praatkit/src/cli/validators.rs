//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate a strictly positive, finite number (time step, window length,
/// frequency ceiling, formant count).
pub fn validate_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;

    if !value.is_finite() {
        return Err(format!("'{s}' must be a finite number"));
    }
    if value <= 0.0 {
        return Err(format!("'{s}' must be greater than zero"));
    }
    Ok(value)
}
