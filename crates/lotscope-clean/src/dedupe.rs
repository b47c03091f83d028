//! Exact full-row duplicate removal.

use std::collections::BTreeSet;

use anyhow::Result;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use lotscope_ingest::column_string;

/// Drops rows identical across all retained columns, keeping the first
/// occurrence and preserving the original order among survivors.
///
/// Returns the filtered frame and the number of rows removed.
pub fn drop_duplicate_rows(df: &DataFrame) -> Result<(DataFrame, usize)> {
    if df.height() == 0 {
        return Ok((df.clone(), 0));
    }
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut seen = BTreeSet::new();
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut composite = String::new();
        for (pos, name) in names.iter().enumerate() {
            if pos > 0 {
                composite.push('\u{1f}');
            }
            composite.push_str(&column_string(df, name, idx));
        }
        keep.push(seen.insert(composite));
    }

    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed == 0 {
        return Ok((df.clone(), 0));
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    Ok((df.filter(&mask)?, removed))
}
