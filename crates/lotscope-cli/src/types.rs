//! Typed result of one analysis run, consumed by the terminal summary.

use std::path::PathBuf;

use lotscope_clean::NullResolution;
use lotscope_ingest::ColumnProfile;
use lotscope_model::ResolvedSchema;
use lotscope_query::QueryOutcome;
use lotscope_report::ChartOutcomes;

#[derive(Debug)]
pub struct AnalysisResult {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Row count of the raw table.
    pub rows_read: usize,
    /// Per-column missingness of the raw table.
    pub raw_profiles: Vec<ColumnProfile>,
    /// Null-policy decisions, in column order.
    pub null_resolutions: Vec<NullResolution>,
    pub duplicates_removed: usize,
    /// Row count after cleaning.
    pub rows_clean: usize,
    pub schema: ResolvedSchema,
    /// Min and max model year of the cleaned table, when the role resolved.
    pub year_range: Option<(i64, i64)>,
    pub queries: Vec<QueryOutcome>,
    /// `None` when chart rendering was disabled.
    pub charts: Option<ChartOutcomes>,
    /// Path of the cleaned-table snapshot, when written.
    pub snapshot: Option<PathBuf>,
}
