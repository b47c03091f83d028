//! The twelve analytical queries and their dispatcher.
//!
//! Each query declares the roles it needs; `run_queries` walks the fixed
//! table in report order and skips any query whose roles did not resolve,
//! emitting a "column not found" diagnostic instead of failing. Everything
//! here is read-only over the cleaned frame; derived values like car age are
//! transient vectors, never columns written back to the table.

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::warn;

use lotscope_ingest::column_string;
use lotscope_model::{AnalysisConfig, ResolvedSchema, Role};

use crate::group::{
    aggregate_groups, distinct_first_seen, f64_values, grouped, sort_asc, sort_desc,
    string_values, value_counts,
};
use crate::stats::{Describe, describe, mean, quantile_linear};

/// Price threshold for the luxury-listings filter query.
pub const LUXURY_PRICE_THRESHOLD: f64 = 165_000.0;

/// Condition floor for the high-condition/high-mileage filter query.
pub const WORKHORSE_CONDITION_MIN: f64 = 48.0;

/// Odometer floor for the high-condition/high-mileage filter query.
pub const WORKHORSE_ODOMETER_MIN: f64 = 90_000.0;

/// Model-year floor for the newer-cars state-price query.
pub const NEWER_CAR_YEAR_MIN: f64 = 2013.0;

/// Condition quantile defining the top-20% value-for-money cohort.
pub const VALUE_CONDITION_QUANTILE: f64 = 0.80;

/// Rows shown when a filter query reports a sample.
const SAMPLE_ROWS: usize = 5;

/// Values shown when listing distinct brands/models.
const DISTINCT_SAMPLE: usize = 10;

/// States reported by the newer-cars price ranking.
const TOP_STATES: usize = 10;

/// Typed result of one query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryReport {
    PriceSummary {
        count: usize,
        mean: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    },
    DistinctColors {
        values: Vec<String>,
    },
    BrandModelCounts {
        brands: usize,
        models: usize,
        brand_sample: Vec<String>,
        model_sample: Vec<String>,
    },
    FilteredRows {
        count: usize,
        sample: Vec<String>,
    },
    TopModels {
        entries: Vec<(String, usize)>,
    },
    GroupedValues {
        value_label: &'static str,
        groups: Vec<(String, f64)>,
    },
    CarAge {
        reference_year: i32,
        stats: Option<Describe>,
    },
    StatePrices {
        groups: Vec<(String, f64)>,
    },
    ValueForMoney {
        threshold: Option<f64>,
        cohort: usize,
        groups: Vec<(String, f64)>,
    },
}

/// Outcome of dispatching one query against the resolved schema.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub name: &'static str,
    pub title: &'static str,
    pub result: QueryResult,
}

#[derive(Debug, Clone)]
pub enum QueryResult {
    /// A required role had no matching column.
    Skipped { missing: Vec<Role> },
    Report(QueryReport),
}

type QueryFn = fn(&DataFrame, &ResolvedSchema, &AnalysisConfig) -> Result<QueryReport>;

/// One query: its identity, its declared role requirements, and its body.
pub struct QuerySpec {
    pub name: &'static str,
    pub title: &'static str,
    pub required: &'static [Role],
    run: QueryFn,
}

/// The twelve queries in report order.
pub const QUERIES: [QuerySpec; 12] = [
    QuerySpec {
        name: "price-summary",
        title: "Car price statistics",
        required: &[Role::Price],
        run: price_summary,
    },
    QuerySpec {
        name: "distinct-colors",
        title: "Unique car colors",
        required: &[Role::Color],
        run: distinct_colors,
    },
    QuerySpec {
        name: "brand-model-counts",
        title: "Unique brands and models",
        required: &[Role::Brand, Role::Model],
        run: brand_model_counts,
    },
    QuerySpec {
        name: "price-above-165k",
        title: "Listings priced above $165,000",
        required: &[Role::Price],
        run: price_above_threshold,
    },
    QuerySpec {
        name: "top-models",
        title: "Top 5 most frequent models",
        required: &[Role::Model],
        run: top_models,
    },
    QuerySpec {
        name: "mean-price-by-brand",
        title: "Mean price by brand",
        required: &[Role::Brand, Role::Price],
        run: mean_price_by_brand,
    },
    QuerySpec {
        name: "min-price-by-interior",
        title: "Minimum price by interior",
        required: &[Role::Interior, Role::Price],
        run: min_price_by_interior,
    },
    QuerySpec {
        name: "max-odometer-by-year",
        title: "Highest odometer reading per year",
        required: &[Role::Year, Role::Odometer],
        run: max_odometer_by_year,
    },
    QuerySpec {
        name: "car-age",
        title: "Car age statistics",
        required: &[Role::Year],
        run: car_age,
    },
    QuerySpec {
        name: "high-condition-high-mileage",
        title: "Condition >= 48 with odometer > 90,000",
        required: &[Role::Condition, Role::Odometer],
        run: high_condition_high_mileage,
    },
    QuerySpec {
        name: "newer-cars-state-prices",
        title: "Mean price by state for cars newer than 2013",
        required: &[Role::Price, Role::Year, Role::State],
        run: newer_cars_state_prices,
    },
    QuerySpec {
        name: "value-for-money",
        title: "Best value brands in the top 20% of condition",
        required: &[Role::Condition, Role::Price, Role::Brand],
        run: value_for_money,
    },
];

/// Runs every query, skipping those with unresolved roles.
pub fn run_queries(
    df: &DataFrame,
    schema: &ResolvedSchema,
    config: &AnalysisConfig,
) -> Result<Vec<QueryOutcome>> {
    let mut outcomes = Vec::with_capacity(QUERIES.len());
    for spec in &QUERIES {
        let missing = schema.missing(spec.required);
        let result = if missing.is_empty() {
            QueryResult::Report((spec.run)(df, schema, config)?)
        } else {
            let names: Vec<&str> = missing.iter().map(|role| role.name()).collect();
            warn!(query = spec.name, missing = ?names, "column not found, skipping query");
            QueryResult::Skipped { missing }
        };
        outcomes.push(QueryOutcome {
            name: spec.name,
            title: spec.title,
            result,
        });
    }
    Ok(outcomes)
}

fn role_column<'a>(schema: &'a ResolvedSchema, role: Role) -> &'a str {
    // Queries only run once the dispatcher has checked their required roles.
    schema.column(role).unwrap_or_default()
}

/// Numeric values of the column resolved for `role`, keeping row alignment.
fn role_f64(df: &DataFrame, schema: &ResolvedSchema, role: Role) -> Result<Vec<Option<f64>>> {
    f64_values(df, role_column(schema, role))
}

fn role_strings(df: &DataFrame, schema: &ResolvedSchema, role: Role) -> Result<Vec<String>> {
    string_values(df, role_column(schema, role))
}

/// Renders the listed rows through the resolved roles, one line per row.
fn sample_rows(df: &DataFrame, schema: &ResolvedSchema, indices: &[usize]) -> Vec<String> {
    indices
        .iter()
        .take(SAMPLE_ROWS)
        .map(|&idx| {
            let fields: Vec<String> = schema
                .resolved()
                .into_iter()
                .map(|(role, column)| format!("{role}={}", column_string(df, column, idx)))
                .collect();
            fields.join(", ")
        })
        .collect()
}

fn price_summary(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let prices: Vec<f64> = role_f64(df, schema, Role::Price)?
        .into_iter()
        .flatten()
        .collect();
    Ok(QueryReport::PriceSummary {
        count: prices.len(),
        mean: mean(&prices),
        min: prices.iter().copied().min_by(|a, b| a.total_cmp(b)),
        max: prices.iter().copied().max_by(|a, b| a.total_cmp(b)),
    })
}

fn distinct_colors(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let colors = role_strings(df, schema, Role::Color)?;
    Ok(QueryReport::DistinctColors {
        values: distinct_first_seen(&colors),
    })
}

fn brand_model_counts(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let brands = distinct_first_seen(&role_strings(df, schema, Role::Brand)?);
    let models = distinct_first_seen(&role_strings(df, schema, Role::Model)?);
    Ok(QueryReport::BrandModelCounts {
        brands: brands.len(),
        models: models.len(),
        brand_sample: brands.into_iter().take(DISTINCT_SAMPLE).collect(),
        model_sample: models.into_iter().take(DISTINCT_SAMPLE).collect(),
    })
}

fn price_above_threshold(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let prices = role_f64(df, schema, Role::Price)?;
    let indices: Vec<usize> = prices
        .iter()
        .enumerate()
        .filter_map(|(idx, price)| match price {
            Some(p) if *p > LUXURY_PRICE_THRESHOLD => Some(idx),
            _ => None,
        })
        .collect();
    Ok(QueryReport::FilteredRows {
        count: indices.len(),
        sample: sample_rows(df, schema, &indices),
    })
}

fn top_models(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let models = role_strings(df, schema, Role::Model)?;
    Ok(QueryReport::TopModels {
        entries: value_counts(&models).into_iter().take(5).collect(),
    })
}

fn mean_price_by_brand(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let brands = role_strings(df, schema, Role::Brand)?;
    let prices = role_f64(df, schema, Role::Price)?;
    let groups = aggregate_groups(grouped(&brands, &prices), mean);
    Ok(QueryReport::GroupedValues {
        value_label: "mean price",
        groups: sort_desc(groups),
    })
}

fn min_price_by_interior(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let interiors = role_strings(df, schema, Role::Interior)?;
    let prices = role_f64(df, schema, Role::Price)?;
    let groups = aggregate_groups(grouped(&interiors, &prices), |values| {
        values.iter().copied().min_by(|a, b| a.total_cmp(b))
    });
    Ok(QueryReport::GroupedValues {
        value_label: "min price",
        groups: sort_asc(groups),
    })
}

fn max_odometer_by_year(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let years = role_strings(df, schema, Role::Year)?;
    let odometers = role_f64(df, schema, Role::Odometer)?;
    let groups = aggregate_groups(grouped(&years, &odometers), |values| {
        values.iter().copied().max_by(|a, b| a.total_cmp(b))
    });
    Ok(QueryReport::GroupedValues {
        value_label: "max odometer",
        groups: sort_desc(groups),
    })
}

fn car_age(
    df: &DataFrame,
    schema: &ResolvedSchema,
    config: &AnalysisConfig,
) -> Result<QueryReport> {
    let ages: Vec<f64> = role_f64(df, schema, Role::Year)?
        .into_iter()
        .flatten()
        .map(|year| f64::from(config.reference_year) - year)
        .collect();
    Ok(QueryReport::CarAge {
        reference_year: config.reference_year,
        stats: describe(&ages),
    })
}

fn high_condition_high_mileage(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let conditions = role_f64(df, schema, Role::Condition)?;
    let odometers = role_f64(df, schema, Role::Odometer)?;
    let indices: Vec<usize> = conditions
        .iter()
        .zip(&odometers)
        .enumerate()
        .filter_map(|(idx, (condition, odometer))| match (condition, odometer) {
            (Some(c), Some(o))
                if *c >= WORKHORSE_CONDITION_MIN && *o > WORKHORSE_ODOMETER_MIN =>
            {
                Some(idx)
            }
            _ => None,
        })
        .collect();
    Ok(QueryReport::FilteredRows {
        count: indices.len(),
        sample: sample_rows(df, schema, &indices),
    })
}

fn newer_cars_state_prices(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let years = role_f64(df, schema, Role::Year)?;
    let states = role_strings(df, schema, Role::State)?;
    let prices = role_f64(df, schema, Role::Price)?;

    let mut newer_states = Vec::new();
    let mut newer_prices = Vec::new();
    for ((year, state), price) in years.iter().zip(&states).zip(&prices) {
        if year.is_some_and(|y| y > NEWER_CAR_YEAR_MIN) {
            newer_states.push(state.clone());
            newer_prices.push(*price);
        }
    }
    let groups = aggregate_groups(grouped(&newer_states, &newer_prices), mean);
    Ok(QueryReport::StatePrices {
        groups: sort_desc(groups).into_iter().take(TOP_STATES).collect(),
    })
}

fn value_for_money(
    df: &DataFrame,
    schema: &ResolvedSchema,
    _config: &AnalysisConfig,
) -> Result<QueryReport> {
    let conditions = role_f64(df, schema, Role::Condition)?;
    let brands = role_strings(df, schema, Role::Brand)?;
    let prices = role_f64(df, schema, Role::Price)?;

    let mut sorted: Vec<f64> = conditions.iter().copied().flatten().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let threshold = quantile_linear(&sorted, VALUE_CONDITION_QUANTILE);

    let Some(threshold_value) = threshold else {
        return Ok(QueryReport::ValueForMoney {
            threshold: None,
            cohort: 0,
            groups: Vec::new(),
        });
    };

    let mut cohort_brands = Vec::new();
    let mut cohort_prices = Vec::new();
    for ((condition, brand), price) in conditions.iter().zip(&brands).zip(&prices) {
        if condition.is_some_and(|c| c >= threshold_value) {
            cohort_brands.push(brand.clone());
            cohort_prices.push(*price);
        }
    }
    let groups = aggregate_groups(grouped(&cohort_brands, &cohort_prices), mean);
    Ok(QueryReport::ValueForMoney {
        threshold,
        cohort: cohort_brands.len(),
        groups: sort_asc(groups),
    })
}
