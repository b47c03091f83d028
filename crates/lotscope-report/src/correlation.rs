//! Pairwise Pearson correlation over the numeric columns.

use anyhow::Result;
use polars::prelude::DataFrame;

use lotscope_ingest::{ColumnKind, profile_columns};
use lotscope_query::group::f64_values;

use crate::numeric::pearson;

/// A square correlation matrix with its column labels.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// `values[i][j]` is the correlation of column `i` with column `j`;
    /// `None` when a pair has too few complete observations or no variance.
    pub values: Vec<Vec<Option<f64>>>,
}

/// Builds the matrix over every numeric column of `df`.
///
/// Returns `None` when fewer than two numeric columns exist. Each pair is
/// correlated over the rows where both values are present.
pub fn correlation_matrix(df: &DataFrame) -> Result<Option<CorrelationMatrix>> {
    let numeric: Vec<String> = profile_columns(df)
        .into_iter()
        .filter(|profile| profile.kind == ColumnKind::Numeric)
        .map(|profile| profile.name)
        .collect();
    if numeric.len() < 2 {
        return Ok(None);
    }

    let mut columns = Vec::with_capacity(numeric.len());
    for name in &numeric {
        columns.push(f64_values(df, name)?);
    }

    let n = numeric.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (x, y) in columns[i].iter().zip(&columns[j]) {
                if let (Some(x), Some(y)) = (x, y) {
                    xs.push(*x);
                    ys.push(*y);
                }
            }
            let r = if i == j {
                Some(1.0)
            } else {
                pearson(&xs, &ys)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(Some(CorrelationMatrix {
        labels: numeric,
        values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    #[test]
    fn correlates_numeric_columns_pairwise() {
        let df = DataFrame::new(vec![
            Series::new("odometer".into(), vec![1.0f64, 2.0, 3.0, 4.0]).into_column(),
            Series::new("price".into(), vec![8.0f64, 6.0, 4.0, 2.0]).into_column(),
            Series::new("color".into(), vec!["a", "b", "c", "d"]).into_column(),
        ])
        .unwrap();

        let matrix = correlation_matrix(&df).unwrap().unwrap();
        assert_eq!(matrix.labels, vec!["odometer", "price"]);
        assert_eq!(matrix.values[0][0], Some(1.0));
        assert!((matrix.values[0][1].unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn one_numeric_column_is_not_enough() {
        let df = DataFrame::new(vec![
            Series::new("price".into(), vec![1.0f64, 2.0]).into_column(),
            Series::new("color".into(), vec!["a", "b"]).into_column(),
        ])
        .unwrap();
        assert!(correlation_matrix(&df).unwrap().is_none());
    }
}
