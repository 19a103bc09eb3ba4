//! Lenient numeric parsing for spreadsheet-exported cells.
//!
//! Source files routinely carry thousands separators ("1,234") and stray
//! padding. Cleaning never fails: anything that is not a number after the
//! separators are removed is reported as missing.

use serde::{Deserialize, Deserializer};

/// Strips comma separators and surrounding whitespace, then parses the rest.
///
/// Returns `None` for empty cells, leftover non-numeric text and `NaN`.
pub fn clean_numeric(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|c| *c != ',').collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_nan() => Some(value),
        _ => None,
    }
}

/// Serde adapter applying [`clean_numeric`] to a cell as it is deserialized.
///
/// Use together with `#[serde(default)]` so an absent column also yields `None`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(clean_numeric))
}
