//! Frequency and binned-aggregate bar charts.

use std::path::Path;

use anyhow::Result;
use polars::prelude::DataFrame;

use lotscope_query::group::{f64_values, string_values, value_counts};
use lotscope_query::mean;

use crate::bins::BinSpec;

use super::style::bar_chart;

/// Condition bin width for the mean-price chart.
const CONDITION_PRICE_BIN: i64 = 5;

/// Condition bin width for the car-count chart.
const CONDITION_COUNT_BIN: i64 = 10;

/// Listing count per state, descending.
pub(crate) fn car_count_by_state(df: &DataFrame, state_col: &str, path: &Path) -> Result<()> {
    let states = string_values(df, state_col)?;
    let counts = value_counts(&states);
    if counts.is_empty() {
        anyhow::bail!("no state values");
    }
    let labels: Vec<String> = counts.iter().map(|(state, _)| state.clone()).collect();
    let values: Vec<f64> = counts.iter().map(|(_, count)| *count as f64).collect();
    bar_chart(
        path,
        "Car Count by State",
        "State",
        "Listings",
        &labels,
        &values,
    )
}

/// Mean price per width-5 condition range.
pub(crate) fn mean_price_by_condition(
    df: &DataFrame,
    price_col: &str,
    condition_col: &str,
    path: &Path,
) -> Result<()> {
    let (conditions, prices) = paired(df, condition_col, price_col)?;
    let bins = condition_bins(&conditions, CONDITION_PRICE_BIN)?;
    let buckets = bins.bucket(&conditions, &prices);

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for (idx, bucket) in buckets.iter().enumerate() {
        if let Some(bucket_mean) = mean(bucket) {
            labels.push(bins.label(idx));
            values.push(bucket_mean);
        }
    }
    if labels.is_empty() {
        anyhow::bail!("no condition values fall inside the bins");
    }
    bar_chart(
        path,
        "Mean Price by Condition Range",
        "Condition range",
        "Mean price ($)",
        &labels,
        &values,
    )
}

/// Listing count per width-10 condition range.
pub(crate) fn car_count_by_condition(
    df: &DataFrame,
    condition_col: &str,
    path: &Path,
) -> Result<()> {
    let conditions: Vec<f64> = f64_values(df, condition_col)?
        .into_iter()
        .flatten()
        .collect();
    let bins = condition_bins(&conditions, CONDITION_COUNT_BIN)?;

    let labels: Vec<String> = (0..bins.len()).map(|idx| bins.label(idx)).collect();
    let values: Vec<f64> = bins
        .counts(&conditions)
        .into_iter()
        .map(|count| count as f64)
        .collect();
    bar_chart(
        path,
        "Car Count by Condition Range",
        "Condition range",
        "Listings",
        &labels,
        &values,
    )
}

fn paired(df: &DataFrame, key_col: &str, value_col: &str) -> Result<(Vec<f64>, Vec<f64>)> {
    let keys = f64_values(df, key_col)?;
    let values = f64_values(df, value_col)?;
    let mut out_keys = Vec::new();
    let mut out_values = Vec::new();
    for (key, value) in keys.iter().zip(&values) {
        if let (Some(k), Some(v)) = (key, value) {
            out_keys.push(*k);
            out_values.push(*v);
        }
    }
    Ok((out_keys, out_values))
}

fn condition_bins(conditions: &[f64], width: i64) -> Result<BinSpec> {
    let min = conditions.iter().copied().fold(f64::INFINITY, f64::min);
    let max = conditions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    BinSpec::fixed_width(min, max, width)
        .ok_or_else(|| anyhow::anyhow!("no usable condition values"))
}
