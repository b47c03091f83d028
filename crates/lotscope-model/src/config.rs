//! Run configuration with documented defaults.
//!
//! Every constant the analysis depends on lives here so a run is fully
//! described by one value: the null-ratio drop threshold, the car-age
//! reference year, the imputation placeholder, and the output toggles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference year used for the derived car-age statistic.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;

/// Columns with a missing ratio above this are dropped outright.
pub const DEFAULT_DROP_NULL_RATIO: f64 = 0.30;

/// Fallback value when a text column has no mode to impute from.
pub const DEFAULT_PLACEHOLDER: &str = "Unknown";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options controlling one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory receiving the cleaned snapshot and chart files.
    pub output_dir: PathBuf,

    /// Year subtracted from the model year to derive car age.
    pub reference_year: i32,

    /// Null-ratio threshold above which a column is dropped instead of imputed.
    pub drop_null_ratio: f64,

    /// Imputation value for text columns whose non-missing values are empty.
    pub placeholder: String,

    /// Render the ten chart files.
    pub render_charts: bool,

    /// Write the cleaned CSV snapshot.
    pub write_snapshot: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            reference_year: DEFAULT_REFERENCE_YEAR,
            drop_null_ratio: DEFAULT_DROP_NULL_RATIO,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            render_charts: true,
            write_snapshot: true,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; absent fields keep defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    #[must_use]
    pub fn with_charts(mut self, enable: bool) -> Self {
        self.render_charts = enable;
        self
    }

    #[must_use]
    pub fn with_snapshot(mut self, enable: bool) -> Self {
        self.write_snapshot = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.reference_year, 2025);
        assert!((config.drop_null_ratio - 0.30).abs() < f64::EPSILON);
        assert_eq!(config.placeholder, "Unknown");
        assert!(config.render_charts);
        assert!(config.write_snapshot);
    }

    #[test]
    fn partial_json_keeps_defaults_for_absent_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"reference_year": 2020, "render_charts": false}}"#).unwrap();
        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.reference_year, 2020);
        assert!(!config.render_charts);
        assert_eq!(config.placeholder, "Unknown");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let error = AnalysisConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
