//! The ten report figures and the dispatcher that renders them.
//!
//! Every figure declares the schema roles it needs; figures whose roles did
//! not resolve (or whose data cannot support the drawing) are skipped and
//! reported, never fatal.

use std::path::PathBuf;

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::{info, warn};

use lotscope_ingest::profile_columns;
use lotscope_model::{AnalysisConfig, ResolvedSchema, Role};

use crate::correlation::correlation_matrix;

mod boxes;
mod counts;
mod matrix;
mod missing;
mod price;
mod style;

/// A figure that made it to disk.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub file_name: &'static str,
    pub path: PathBuf,
}

/// A figure that could not be drawn, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedChart {
    pub file_name: &'static str,
    pub reason: String,
}

/// Outcome of a full render pass.
#[derive(Debug, Default)]
pub struct ChartOutcomes {
    pub rendered: Vec<RenderedChart>,
    pub skipped: Vec<SkippedChart>,
    /// First-to-last relative change of the mean price by year, percent.
    pub price_change_pct: Option<f64>,
}

impl ChartOutcomes {
    fn rendered(&mut self, file_name: &'static str, path: PathBuf) {
        info!(chart = file_name, "chart rendered");
        self.rendered.push(RenderedChart { file_name, path });
    }

    fn skipped(&mut self, file_name: &'static str, reason: String) {
        warn!(chart = file_name, reason, "chart skipped");
        self.skipped.push(SkippedChart { file_name, reason });
    }
}

/// Renders every figure into `config.output_dir`.
///
/// The missing-value figures read the raw table; everything else reads the
/// cleaned one.
pub fn render_all(
    raw: &DataFrame,
    cleaned: &DataFrame,
    schema: &ResolvedSchema,
    config: &AnalysisConfig,
) -> Result<ChartOutcomes> {
    std::fs::create_dir_all(&config.output_dir)?;
    let mut outcomes = ChartOutcomes::default();

    {
        let file = "01_missing_values_bar.png";
        let path = config.output_dir.join(file);
        let profiles = profile_columns(raw);
        match missing::missing_values_bar(&profiles, &path) {
            Ok(()) => outcomes.rendered(file, path),
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    {
        let file = "02_missing_values_heatmap.png";
        let path = config.output_dir.join(file);
        match missing::missing_values_heatmap(raw, &path) {
            Ok(()) => outcomes.rendered(file, path),
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    {
        let file = "03_correlation_matrix.png";
        let path = config.output_dir.join(file);
        match correlation_matrix(cleaned) {
            Ok(Some(corr)) => match matrix::correlation_grid(&corr, &path) {
                Ok(()) => outcomes.rendered(file, path),
                Err(error) => outcomes.skipped(file, error.to_string()),
            },
            Ok(None) => outcomes.skipped(file, "fewer than two numeric columns".into()),
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    if let Some((price, year)) =
        role_pair(schema, &mut outcomes, "04_mean_price_by_year.png", Role::Price, Role::Year)
    {
        let file = "04_mean_price_by_year.png";
        let path = config.output_dir.join(file);
        match price::mean_price_by_year(cleaned, price, year, &path) {
            Ok(change) => {
                outcomes.price_change_pct = change;
                outcomes.rendered(file, path);
            }
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    if let Some((price, odometer)) = role_pair(
        schema,
        &mut outcomes,
        "05_mean_price_by_odometer.png",
        Role::Price,
        Role::Odometer,
    ) {
        let file = "05_mean_price_by_odometer.png";
        let path = config.output_dir.join(file);
        match price::mean_price_by_odometer(cleaned, price, odometer, &path) {
            Ok(()) => outcomes.rendered(file, path),
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    {
        let file = "06_car_count_by_state.png";
        if let Some(state) = role_column(schema, &mut outcomes, file, Role::State) {
            let path = config.output_dir.join(file);
            match counts::car_count_by_state(cleaned, state, &path) {
                Ok(()) => outcomes.rendered(file, path),
                Err(error) => outcomes.skipped(file, error.to_string()),
            }
        }
    }

    if let Some((price, condition)) = role_pair(
        schema,
        &mut outcomes,
        "07_mean_price_by_condition.png",
        Role::Price,
        Role::Condition,
    ) {
        let file = "07_mean_price_by_condition.png";
        let path = config.output_dir.join(file);
        match counts::mean_price_by_condition(cleaned, price, condition, &path) {
            Ok(()) => outcomes.rendered(file, path),
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    {
        let file = "08_car_count_by_condition.png";
        if let Some(condition) = role_column(schema, &mut outcomes, file, Role::Condition) {
            let path = config.output_dir.join(file);
            match counts::car_count_by_condition(cleaned, condition, &path) {
                Ok(()) => outcomes.rendered(file, path),
                Err(error) => outcomes.skipped(file, error.to_string()),
            }
        }
    }

    if let Some((price, color)) = role_pair(
        schema,
        &mut outcomes,
        "09_price_by_color.png",
        Role::Price,
        Role::Color,
    ) {
        let file = "09_price_by_color.png";
        let path = config.output_dir.join(file);
        match boxes::price_by_color(cleaned, price, color, &path) {
            Ok(()) => outcomes.rendered(file, path),
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    if let Some((price, color)) = role_pair(
        schema,
        &mut outcomes,
        "10_price_by_color_trimmed.png",
        Role::Price,
        Role::Color,
    ) {
        let file = "10_price_by_color_trimmed.png";
        let path = config.output_dir.join(file);
        match boxes::price_by_color_trimmed(cleaned, price, color, &path) {
            Ok(()) => outcomes.rendered(file, path),
            Err(error) => outcomes.skipped(file, error.to_string()),
        }
    }

    Ok(outcomes)
}

fn role_column<'a>(
    schema: &'a ResolvedSchema,
    outcomes: &mut ChartOutcomes,
    file_name: &'static str,
    role: Role,
) -> Option<&'a str> {
    match schema.column(role) {
        Some(column) => Some(column),
        None => {
            outcomes.skipped(file_name, format!("no {role} column resolved"));
            None
        }
    }
}

fn role_pair<'a>(
    schema: &'a ResolvedSchema,
    outcomes: &mut ChartOutcomes,
    file_name: &'static str,
    first: Role,
    second: Role,
) -> Option<(&'a str, &'a str)> {
    let missing = schema.missing(&[first, second]);
    if missing.is_empty() {
        // both resolved, unwraps cannot fire
        return Some((schema.column(first)?, schema.column(second)?));
    }
    let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
    outcomes.skipped(file_name, format!("unresolved roles: {}", names.join(", ")));
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    fn schema_for(columns: &[&str]) -> ResolvedSchema {
        let names: Vec<String> = columns.iter().map(|s| (*s).to_string()).collect();
        ResolvedSchema::resolve(&names)
    }

    #[test]
    fn unresolved_roles_skip_the_chart_with_a_reason() {
        let schema = schema_for(&["sellingprice"]);
        let mut outcomes = ChartOutcomes::default();
        assert!(role_pair(&schema, &mut outcomes, "x.png", Role::Price, Role::Year).is_none());
        assert_eq!(outcomes.skipped.len(), 1);
        assert!(outcomes.skipped[0].reason.contains("year"));
    }

    #[test]
    fn render_pass_reports_every_figure_once() {
        // A table with no role columns: the data-independent figures render,
        // the role-gated ones are all reported as skipped.
        let df = DataFrame::new(vec![
            Series::new("a".into(), vec![1.0f64, 2.0, 3.0]).into_column(),
            Series::new("b".into(), vec![3.0f64, 2.0, 1.0]).into_column(),
        ])
        .unwrap();
        let schema = schema_for(&["a", "b"]);
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::default().with_output_dir(dir.path());

        let outcomes = render_all(&df, &df, &schema, &config).unwrap();
        assert_eq!(outcomes.rendered.len() + outcomes.skipped.len(), 10);
        let skipped: Vec<&str> = outcomes
            .skipped
            .iter()
            .map(|chart| chart.file_name)
            .collect();
        assert!(skipped.contains(&"04_mean_price_by_year.png"));
        assert!(skipped.contains(&"10_price_by_color_trimmed.png"));
    }
}
