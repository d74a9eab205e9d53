//! Count text parsing and grid quantisation.
//!
//! Users type counts as plain decimals. Committed values are snapped to the
//! nearest grid quantum (`1 / cells_per_count`) before they reach a timeline.

use crate::error::{Result, ShotCallError};

/// Snap `value` to the nearest multiple of `1 / cells_per_count`.
#[inline]
pub fn quantize(value: f64, cells_per_count: u32) -> f64 {
    let cells = f64::from(cells_per_count.max(1));
    (value * cells).round() / cells
}

/// Parse user-entered count text and snap it to the grid.
///
/// Accepts an unsigned decimal (`"3"`, `"2.5"`, `".75"`), surrounded by optional
/// whitespace. Empty, non-numeric, non-finite and signed input is rejected.
pub fn parse_count(text: &str, cells_per_count: u32) -> Result<f64> {
    match parse_decimal(text)? {
        Decimal::Unsigned(value) => Ok(quantize(value, cells_per_count)),
        Decimal::Negative(_) => Err(ShotCallError::InvalidCount(text.to_string())),
    }
}

/// Parse user-entered padding text. Same grammar as [`parse_count`], but a
/// minus sign is reported as unbounded padding instead of a bad count.
pub fn parse_padding(text: &str, cells_per_count: u32) -> Result<f64> {
    match parse_decimal(text)? {
        Decimal::Unsigned(value) => Ok(quantize(value, cells_per_count)),
        Decimal::Negative(value) => Err(ShotCallError::UnboundedPadding(-value)),
    }
}

/// Render a count for display in an edit field.
///
/// Whole counts keep one decimal (`"2.0"`); fractional counts print as-is (`"1.25"`).
pub fn format_count(value: f64) -> String {
    // Fold -0.0 into 0.0.
    let value = value + 0.0;
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// A well-formed decimal, split from its sign.
enum Decimal {
    Unsigned(f64),
    /// Magnitude of a value typed with a leading `-`.
    Negative(f64),
}

fn parse_decimal(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let well_formed = !digits.is_empty()
        && digits != "."
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().filter(|&c| c == '.').count() <= 1;
    if !well_formed {
        return Err(ShotCallError::InvalidCount(text.to_string()));
    }
    let magnitude = digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ShotCallError::InvalidCount(text.to_string()))?;
    Ok(if negative {
        Decimal::Negative(magnitude)
    } else {
        Decimal::Unsigned(magnitude)
    })
}
