//! Per-column null resolution.
//!
//! Policy (fixed constants, see `AnalysisConfig`):
//! - ratio above the drop threshold: drop the column entirely;
//! - ratio in (0, threshold], numeric column: impute the median;
//! - ratio in (0, threshold], text column: impute the mode, falling back to
//!   the configured placeholder when every value is missing;
//! - ratio 0: untouched.
//!
//! Columns are independent, so processing order cannot change the result.

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::{AnyValue, DataFrame, NamedFrom, Series};
use tracing::debug;

use lotscope_ingest::{ColumnKind, any_to_f64, any_to_string, cell_is_missing, profile_columns};
use lotscope_model::AnalysisConfig;

/// What happened to one column that had missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum NullAction {
    DroppedColumn,
    FilledMedian(f64),
    FilledMode(String),
    FilledPlaceholder(String),
}

/// Record of one applied resolution, kept for the run summary.
#[derive(Debug, Clone)]
pub struct NullResolution {
    pub column: String,
    pub null_ratio: f64,
    pub action: NullAction,
}

/// Applies the null policy and returns the resolved frame.
///
/// Pure with respect to `df`: the input frame is left untouched. Columns
/// without missing values are not recorded.
pub fn resolve_nulls(
    df: &DataFrame,
    config: &AnalysisConfig,
) -> Result<(DataFrame, Vec<NullResolution>)> {
    let mut resolved = df.clone();
    let mut resolutions = Vec::new();

    for profile in profile_columns(df) {
        let ratio = profile.null_ratio();
        if ratio == 0.0 {
            continue;
        }
        if ratio > config.drop_null_ratio {
            resolved = resolved.drop(&profile.name)?;
            debug!(column = %profile.name, ratio, "dropped column");
            resolutions.push(NullResolution {
                column: profile.name,
                null_ratio: ratio,
                action: NullAction::DroppedColumn,
            });
            continue;
        }
        let action = match profile.kind {
            ColumnKind::Numeric => impute_median(&mut resolved, &profile.name)?,
            ColumnKind::Text => impute_mode(&mut resolved, &profile.name, &config.placeholder)?,
        };
        debug!(column = %profile.name, ratio, ?action, "imputed column");
        resolutions.push(NullResolution {
            column: profile.name,
            null_ratio: ratio,
            action,
        });
    }

    Ok((resolved, resolutions))
}

fn impute_median(df: &mut DataFrame, name: &str) -> Result<NullAction> {
    let column = df.column(name)?;
    let mut values: Vec<Option<f64>> = Vec::with_capacity(df.height());
    let mut present: Vec<f64> = Vec::new();
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        let parsed = if cell_is_missing(&value) {
            None
        } else {
            any_to_f64(value)
        };
        if let Some(v) = parsed {
            present.push(v);
        }
        values.push(parsed);
    }
    let median = median_of(&mut present).unwrap_or(0.0);
    let filled: Vec<f64> = values.into_iter().map(|v| v.unwrap_or(median)).collect();
    df.with_column(Series::new(name.into(), filled))?;
    Ok(NullAction::FilledMedian(median))
}

fn impute_mode(df: &mut DataFrame, name: &str, placeholder: &str) -> Result<NullAction> {
    let column = df.column(name)?;
    let mut values: Vec<Option<String>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if cell_is_missing(&value) {
            values.push(None);
        } else {
            values.push(Some(any_to_string(value)));
        }
    }
    let mode = mode_of(values.iter().flatten().map(String::as_str));
    let (fill, action) = match mode {
        Some(mode) => (mode.clone(), NullAction::FilledMode(mode)),
        None => (
            placeholder.to_string(),
            NullAction::FilledPlaceholder(placeholder.to_string()),
        ),
    };
    let filled: Vec<String> = values
        .into_iter()
        .map(|v| v.unwrap_or_else(|| fill.clone()))
        .collect();
    df.with_column(Series::new(name.into(), filled))?;
    Ok(action)
}

/// Median with linear interpolation between the two middle values.
fn median_of(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Most frequent value; ties break by first occurrence.
fn mode_of<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut order = 0usize;
    for value in values {
        let entry = counts.entry(value).or_insert_with(|| {
            let slot = (0, order);
            order += 1;
            slot
        });
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
        .map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_interpolates_even_counts() {
        assert_eq!(median_of(&mut [3.0, 1.0, 2.0, 4.0]), Some(2.5));
        assert_eq!(median_of(&mut [5.0, 1.0, 3.0]), Some(3.0));
        assert_eq!(median_of(&mut []), None);
    }

    #[test]
    fn mode_prefers_first_seen_on_ties() {
        let values = ["white", "black", "black", "white"];
        assert_eq!(mode_of(values.into_iter()), Some("white".to_string()));
        assert_eq!(mode_of(std::iter::empty()), None);
    }
}
