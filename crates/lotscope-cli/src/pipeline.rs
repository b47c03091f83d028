//! Analysis pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the listings CSV, profile per-column missingness
//! 2. **Clean**: apply the null policy, drop duplicate rows, snapshot
//! 3. **Resolve**: match cleaned columns to semantic roles
//! 4. **Query**: run the twelve aggregations over the cleaned table
//! 5. **Report**: render the figures
//!
//! Each stage takes the output of the previous stage and returns typed
//! results; the raw table survives cleaning untouched so the missing-value
//! figures can read it.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use lotscope_clean::{NullResolution, drop_duplicate_rows, resolve_nulls, write_snapshot};
use lotscope_ingest::{ColumnProfile, profile_columns, read_listings};
use lotscope_model::{AnalysisConfig, ResolvedSchema, Role};
use lotscope_query::group::f64_values;
use lotscope_query::run_queries;
use lotscope_report::render_all;

use crate::types::AnalysisResult;

/// File name of the cleaned-table snapshot inside the output directory.
pub const SNAPSHOT_FILE: &str = "car_listings_cleaned.csv";

/// Result of the ingest stage.
pub struct IngestStage {
    pub raw: DataFrame,
    pub profiles: Vec<ColumnProfile>,
}

/// Read the source CSV and profile its columns.
pub fn ingest(path: &Path) -> Result<IngestStage> {
    let span = info_span!("ingest");
    let _guard = span.enter();
    let started = Instant::now();
    let raw = read_listings(path).context("read listings")?;
    let profiles = profile_columns(&raw);
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        columns = profiles.len(),
        "ingest complete"
    );
    Ok(IngestStage { raw, profiles })
}

/// Result of the clean stage.
pub struct CleanStage {
    pub cleaned: DataFrame,
    pub resolutions: Vec<NullResolution>,
    pub duplicates_removed: usize,
}

/// Apply the null policy, then drop full-row duplicates.
pub fn clean(raw: &DataFrame, config: &AnalysisConfig) -> Result<CleanStage> {
    let span = info_span!("clean");
    let _guard = span.enter();
    let started = Instant::now();
    let (resolved, resolutions) = resolve_nulls(raw, config).context("resolve nulls")?;
    let (cleaned, duplicates_removed) = drop_duplicate_rows(&resolved).context("deduplicate")?;
    info!(
        resolutions = resolutions.len(),
        duplicates_removed,
        rows = cleaned.height(),
        "table cleaned"
    );
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "clean complete"
    );
    Ok(CleanStage {
        cleaned,
        resolutions,
        duplicates_removed,
    })
}

/// Run the whole analysis end to end.
pub fn run_analysis(input: &Path, config: &AnalysisConfig) -> Result<AnalysisResult> {
    let span = info_span!("analysis", input = %input.display());
    let _guard = span.enter();

    let ingested = ingest(input)?;
    let rows_read = ingested.raw.height();

    let cleaned_stage = clean(&ingested.raw, config)?;

    let snapshot = if config.write_snapshot {
        let path = config.output_dir.join(SNAPSHOT_FILE);
        write_snapshot(&cleaned_stage.cleaned, &path).context("write snapshot")?;
        info!(path = %path.display(), "snapshot written");
        Some(path)
    } else {
        None
    };

    let names: Vec<String> = cleaned_stage
        .cleaned
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let schema = ResolvedSchema::resolve(&names);
    info!(resolved = schema.resolved().len(), "schema roles resolved");
    let year_range = year_range(&cleaned_stage.cleaned, &schema);

    let queries = run_queries(&cleaned_stage.cleaned, &schema, config).context("run queries")?;

    let charts = if config.render_charts {
        Some(
            render_all(&ingested.raw, &cleaned_stage.cleaned, &schema, config)
                .context("render charts")?,
        )
    } else {
        None
    };

    Ok(AnalysisResult {
        input: input.to_path_buf(),
        output_dir: config.output_dir.clone(),
        rows_read,
        raw_profiles: ingested.profiles,
        null_resolutions: cleaned_stage.resolutions,
        duplicates_removed: cleaned_stage.duplicates_removed,
        rows_clean: cleaned_stage.cleaned.height(),
        schema,
        year_range,
        queries,
        charts,
        snapshot,
    })
}

/// Min and max model year of the cleaned table, for the overview line.
fn year_range(df: &DataFrame, schema: &ResolvedSchema) -> Option<(i64, i64)> {
    let column = schema.column(Role::Year)?;
    let years: Vec<f64> = f64_values(df, column).ok()?.into_iter().flatten().collect();
    let min = years.iter().copied().fold(f64::INFINITY, f64::min);
    let max = years.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min.is_finite() && max.is_finite()).then(|| (min as i64, max as i64))
}
