//! Integration tests for the query dispatcher and the twelve operations.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use lotscope_model::{AnalysisConfig, ResolvedSchema, Role};
use lotscope_query::{QueryReport, QueryResult, run_queries};

fn df_with(columns: Vec<Column>) -> (DataFrame, ResolvedSchema) {
    let df = DataFrame::new(columns).unwrap();
    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    (df, ResolvedSchema::resolve(&names))
}

fn outcome_report(outcomes: &[lotscope_query::QueryOutcome], name: &str) -> QueryReport {
    let outcome = outcomes
        .iter()
        .find(|outcome| outcome.name == name)
        .unwrap_or_else(|| panic!("no outcome named {name}"));
    match &outcome.result {
        QueryResult::Report(report) => report.clone(),
        QueryResult::Skipped { missing } => panic!("{name} skipped, missing {missing:?}"),
    }
}

#[test]
fn grouped_mean_by_brand_sorts_descending() {
    let (df, schema) = df_with(vec![
        Series::new("make".into(), vec!["A", "A", "B"]).into_column(),
        Series::new("sellingprice".into(), vec![100.0f64, 200.0, 300.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::GroupedValues { groups, .. } = outcome_report(&outcomes, "mean-price-by-brand")
    else {
        panic!("wrong report shape");
    };
    assert_eq!(groups, vec![("B".to_string(), 300.0), ("A".to_string(), 150.0)]);
}

#[test]
fn top_models_rank_by_frequency_with_first_seen_ties() {
    let (df, schema) = df_with(vec![
        Series::new("model".into(), vec!["x", "x", "y", "y", "y", "z"]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::TopModels { entries } = outcome_report(&outcomes, "top-models") else {
        panic!("wrong report shape");
    };
    assert_eq!(entries[0], ("y".to_string(), 3));
    assert_eq!(entries[1], ("x".to_string(), 2));
    assert_eq!(entries[2], ("z".to_string(), 1));
}

#[test]
fn luxury_filter_is_strictly_greater_than() {
    let (df, schema) = df_with(vec![
        Series::new(
            "sellingprice".into(),
            vec![100_000.0f64, 170_000.0, 200_000.0, 165_000.0],
        )
        .into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::FilteredRows { count, sample } =
        outcome_report(&outcomes, "price-above-165k")
    else {
        panic!("wrong report shape");
    };
    // 165000 itself is excluded
    assert_eq!(count, 2);
    assert_eq!(sample.len(), 2);
    assert!(sample[0].contains("price=170000"));
}

#[test]
fn price_summary_reports_mean_min_max() {
    let (df, schema) = df_with(vec![
        Series::new("sellingprice".into(), vec![100.0f64, 200.0, 300.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::PriceSummary { count, mean, min, max } =
        outcome_report(&outcomes, "price-summary")
    else {
        panic!("wrong report shape");
    };
    assert_eq!(count, 3);
    assert_eq!(mean, Some(200.0));
    assert_eq!(min, Some(100.0));
    assert_eq!(max, Some(300.0));
}

#[test]
fn min_price_by_interior_sorts_ascending() {
    let (df, schema) = df_with(vec![
        Series::new("interior".into(), vec!["black", "beige", "black"]).into_column(),
        Series::new("sellingprice".into(), vec![900.0f64, 500.0, 700.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::GroupedValues { groups, .. } =
        outcome_report(&outcomes, "min-price-by-interior")
    else {
        panic!("wrong report shape");
    };
    assert_eq!(
        groups,
        vec![("beige".to_string(), 500.0), ("black".to_string(), 700.0)]
    );
}

#[test]
fn max_odometer_by_year_sorts_descending() {
    let (df, schema) = df_with(vec![
        Series::new("year".into(), vec![2012i64, 2014, 2012]).into_column(),
        Series::new("odometer".into(), vec![80_000.0f64, 20_000.0, 120_000.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::GroupedValues { groups, .. } =
        outcome_report(&outcomes, "max-odometer-by-year")
    else {
        panic!("wrong report shape");
    };
    assert_eq!(
        groups,
        vec![("2012".to_string(), 120_000.0), ("2014".to_string(), 20_000.0)]
    );
}

#[test]
fn car_age_uses_the_configured_reference_year() {
    let (df, schema) = df_with(vec![
        Series::new("year".into(), vec![2015i64, 2020, 2025]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::CarAge { reference_year, stats } = outcome_report(&outcomes, "car-age")
    else {
        panic!("wrong report shape");
    };
    let stats = stats.unwrap();
    assert_eq!(reference_year, 2025);
    assert_eq!(stats.count, 3);
    assert_eq!(stats.min, 0.0);
    assert_eq!(stats.max, 10.0);
    assert_eq!(stats.mean, 5.0);
}

#[test]
fn workhorse_filter_combines_both_conditions() {
    let (df, schema) = df_with(vec![
        Series::new("condition".into(), vec![48.0f64, 49.0, 10.0, 48.0]).into_column(),
        Series::new("odometer".into(), vec![95_000.0f64, 80_000.0, 100_000.0, 90_000.0])
            .into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::FilteredRows { count, .. } =
        outcome_report(&outcomes, "high-condition-high-mileage")
    else {
        panic!("wrong report shape");
    };
    // row 0 passes; row 1 fails odometer; row 2 fails condition;
    // row 3 fails odometer (strict >)
    assert_eq!(count, 1);
}

#[test]
fn state_prices_only_consider_newer_cars() {
    let (df, schema) = df_with(vec![
        Series::new("year".into(), vec![2012i64, 2014, 2015, 2016]).into_column(),
        Series::new("state".into(), vec!["ca", "ca", "tx", "tx"]).into_column(),
        Series::new("sellingprice".into(), vec![999_999.0f64, 100.0, 200.0, 400.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::StatePrices { groups } =
        outcome_report(&outcomes, "newer-cars-state-prices")
    else {
        panic!("wrong report shape");
    };
    // the 2012 California outlier is filtered out before grouping
    assert_eq!(
        groups,
        vec![("tx".to_string(), 300.0), ("ca".to_string(), 100.0)]
    );
}

#[test]
fn value_for_money_uses_linear_interpolation_and_sorts_ascending() {
    let conditions: Vec<f64> = (1..=5).map(f64::from).collect();
    let (df, schema) = df_with(vec![
        Series::new("condition".into(), conditions).into_column(),
        Series::new("make".into(), vec!["A", "A", "B", "B", "A"]).into_column(),
        Series::new("sellingprice".into(), vec![10.0f64, 20.0, 30.0, 40.0, 5.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::ValueForMoney { threshold, cohort, groups } =
        outcome_report(&outcomes, "value-for-money")
    else {
        panic!("wrong report shape");
    };
    // 80th percentile of [1..5] with linear interpolation
    assert!((threshold.unwrap() - 4.2).abs() < 1e-12);
    // only the condition=5 row is at or above the threshold
    assert_eq!(cohort, 1);
    assert_eq!(groups, vec![("A".to_string(), 5.0)]);
}

#[test]
fn queries_with_unresolved_roles_are_skipped() {
    let (df, schema) = df_with(vec![
        Series::new("sellingprice".into(), vec![100.0f64, 200.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();
    assert_eq!(outcomes.len(), 12);

    let colors = outcomes
        .iter()
        .find(|outcome| outcome.name == "distinct-colors")
        .unwrap();
    match &colors.result {
        QueryResult::Skipped { missing } => assert_eq!(missing, &vec![Role::Color]),
        QueryResult::Report(_) => panic!("should have been skipped"),
    }

    // price-only queries still run
    assert!(matches!(
        outcomes[0].result,
        QueryResult::Report(QueryReport::PriceSummary { .. })
    ));
}

#[test]
fn single_group_inputs_yield_trivial_reports() {
    let (df, schema) = df_with(vec![
        Series::new("make".into(), vec!["A", "A"]).into_column(),
        Series::new("sellingprice".into(), vec![100.0f64, 300.0]).into_column(),
    ]);
    let outcomes = run_queries(&df, &schema, &AnalysisConfig::default()).unwrap();

    let QueryReport::GroupedValues { groups, .. } = outcome_report(&outcomes, "mean-price-by-brand")
    else {
        panic!("wrong report shape");
    };
    assert_eq!(groups, vec![("A".to_string(), 200.0)]);
}
