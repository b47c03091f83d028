//! Polars `AnyValue` conversion helpers.
//!
//! The query and report stages read cells positionally, so everything funnels
//! through these conversions: display strings for grouping keys, `f64` for
//! arithmetic, and a single definition of "missing".

use polars::prelude::{AnyValue, DataFrame};

/// Converts an `AnyValue` to its display string. Null becomes the empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a float without trailing zeros ("15.50" -> "15.5", "3.0" -> "3").
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an `AnyValue` to `f64`, parsing string cells when possible.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Parses a trimmed string as `f64`; empty strings parse to `None`.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// A cell is missing when it is null or blank after trimming.
pub fn cell_is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::String(s) => s.trim().is_empty(),
        AnyValue::StringOwned(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Display string of the cell at (`name`, `idx`); empty when the column is absent.
pub fn column_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_numeric_strips_trailing_zeros() {
        assert_eq!(format_numeric(15.50), "15.5");
        assert_eq!(format_numeric(3.0), "3");
        assert_eq!(format_numeric(0.25), "0.25");
    }

    #[test]
    fn parse_f64_rejects_blank_and_garbage() {
        assert_eq!(parse_f64("  12500 "), Some(12500.0));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("   "), None);
        assert_eq!(parse_f64("n/a"), None);
    }

    #[test]
    fn missing_covers_null_and_blank_strings() {
        assert!(cell_is_missing(&AnyValue::Null));
        assert!(cell_is_missing(&AnyValue::String("  ")));
        assert!(!cell_is_missing(&AnyValue::String("black")));
        assert!(!cell_is_missing(&AnyValue::Float64(0.0)));
    }
}
