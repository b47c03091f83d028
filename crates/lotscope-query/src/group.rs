//! Column extraction and grouped aggregation.
//!
//! Group keys are display strings compared for exact equality; key order is
//! first-seen table order so that stable sorts preserve it as the tie-break.

use anyhow::Result;
use polars::prelude::{AnyValue, DataFrame};

use lotscope_ingest::{any_to_f64, any_to_string};

/// All display-string values of a column, in row order.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// All numeric values of a column, in row order; unparsable cells are `None`.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Distinct values in first-seen order.
pub fn distinct_first_seen(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut distinct = Vec::new();
    for value in values {
        if seen.insert(value.as_str()) {
            distinct.push(value.clone());
        }
    }
    distinct
}

/// Occurrence counts sorted descending; ties keep first-seen order.
pub fn value_counts(values: &[String]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index = std::collections::HashMap::new();
    for value in values {
        let pos = *index.entry(value.clone()).or_insert_with(|| {
            counts.push((value.clone(), 0));
            counts.len() - 1
        });
        counts[pos].1 += 1;
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Groups `values` by `keys` in first-seen key order; rows where the value is
/// `None` contribute the key but no value.
pub fn grouped(keys: &[String], values: &[Option<f64>]) -> Vec<(String, Vec<f64>)> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index = std::collections::HashMap::new();
    for (key, value) in keys.iter().zip(values) {
        let pos = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key.clone(), Vec::new()));
            groups.len() - 1
        });
        if let Some(v) = value {
            groups[pos].1.push(*v);
        }
    }
    groups
}

/// Applies `aggregate` per group, dropping groups it cannot summarize.
pub fn aggregate_groups(
    groups: Vec<(String, Vec<f64>)>,
    aggregate: impl Fn(&[f64]) -> Option<f64>,
) -> Vec<(String, f64)> {
    groups
        .into_iter()
        .filter_map(|(key, values)| aggregate(&values).map(|v| (key, v)))
        .collect()
}

/// Stable descending sort by aggregated value.
pub fn sort_desc(mut groups: Vec<(String, f64)>) -> Vec<(String, f64)> {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups
}

/// Stable ascending sort by aggregated value.
pub fn sort_asc(mut groups: Vec<(String, f64)>) -> Vec<(String, f64)> {
    groups.sort_by(|a, b| a.1.total_cmp(&b.1));
    groups
}
