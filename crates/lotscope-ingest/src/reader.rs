//! Polars-backed CSV reading.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::info;

/// Reads a listings CSV into a `DataFrame`.
///
/// The header row is required; column types (numeric vs text) come from
/// polars schema inference. A missing or unreadable file is fatal for the
/// whole run, so the error carries the path.
pub fn read_listings(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        anyhow::bail!("CSV file not found: {}", path.display());
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .with_context(|| format!("failed to open CSV reader: {}", path.display()))?
        .finish()
        .with_context(|| format!("failed to parse CSV: {}", path.display()))?;

    info!(
        rows = df.height(),
        columns = df.width(),
        path = %path.display(),
        "ingested listings file"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headers_and_rows() {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "year,make,sellingprice").unwrap();
        writeln!(file, "2014,Kia,21500").unwrap();
        writeln!(file, "2015,BMW,30000").unwrap();
        file.flush().unwrap();

        let df = read_listings(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn missing_file_is_fatal() {
        let error = read_listings(Path::new("/nonexistent/listings.csv")).unwrap_err();
        assert!(error.to_string().contains("not found"));
    }
}
