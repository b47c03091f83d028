//! Cleaned-snapshot persistence.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::info;

/// Writes the cleaned table as a CSV snapshot with headers.
///
/// This is the one durable artifact of the cleaning stage; queries and
/// charts read the in-memory frame, external consumers read this file.
pub fn write_snapshot(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("failed to create snapshot file: {}", path.display()))?;
    let mut out = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)
        .with_context(|| format!("failed to write snapshot: {}", path.display()))?;
    info!(rows = out.height(), path = %path.display(), "wrote cleaned snapshot");
    Ok(())
}
