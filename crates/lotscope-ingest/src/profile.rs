//! Per-column missingness profiling over the raw table.
//!
//! Profiles are computed before any cleaning: they drive the null-resolution
//! policy and the two pre-cleaning charts (missing-value bar and heatmap).

use polars::prelude::{AnyValue, DataFrame, DataType};

use crate::values::cell_is_missing;

/// Coarse column kind used to pick a cleaning strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => ColumnKind::Numeric,
            _ => ColumnKind::Text,
        }
    }
}

/// Missingness summary for one column of the raw table.
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub rows: usize,
}

impl ColumnProfile {
    /// Fraction of missing cells; 0 for an empty table.
    pub fn null_ratio(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.missing as f64 / self.rows as f64
        }
    }
}

/// Profiles every column of `df` in table order.
pub fn profile_columns(df: &DataFrame) -> Vec<ColumnProfile> {
    let rows = df.height();
    df.get_columns()
        .iter()
        .map(|column| {
            let mut missing = 0usize;
            for idx in 0..rows {
                let value = column.get(idx).unwrap_or(AnyValue::Null);
                if cell_is_missing(&value) {
                    missing += 1;
                }
            }
            ColumnProfile {
                name: column.name().to_string(),
                kind: ColumnKind::from_dtype(column.dtype()),
                missing,
                rows,
            }
        })
        .collect()
}

/// Row-major missingness mask of the raw table, consumed by the heatmap chart.
pub fn missing_mask(df: &DataFrame) -> Vec<Vec<bool>> {
    let columns = df.get_columns();
    (0..df.height())
        .map(|idx| {
            columns
                .iter()
                .map(|column| {
                    let value = column.get(idx).unwrap_or(AnyValue::Null);
                    cell_is_missing(&value)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    fn test_df() -> DataFrame {
        let cols: Vec<Column> = vec![
            Series::new("price".into(), vec![Some(100.0f64), None, Some(300.0)]).into_column(),
            Series::new("color".into(), vec!["black", "", "white"]).into_column(),
        ];
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn counts_nulls_and_blank_strings() {
        let profiles = profile_columns(&test_df());
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].kind, ColumnKind::Numeric);
        assert_eq!(profiles[0].missing, 1);
        assert_eq!(profiles[1].kind, ColumnKind::Text);
        assert_eq!(profiles[1].missing, 1);
        assert!((profiles[0].null_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn mask_aligns_with_profiles() {
        let mask = missing_mask(&test_df());
        assert_eq!(mask.len(), 3);
        assert_eq!(mask[1], vec![true, true]);
        assert_eq!(mask[0], vec![false, false]);
    }
}
