//! End-to-end pipeline tests over a small synthetic CSV export.

use std::io::Write;

use lotscope_clean::NullAction;
use lotscope_cli::pipeline::{SNAPSHOT_FILE, run_analysis};
use lotscope_model::{ALL_ROLES, AnalysisConfig};
use lotscope_query::{QueryReport, QueryResult};
use tempfile::{NamedTempFile, TempDir};

const LISTINGS: &str = "\
year,make,model,condition,odometer,color,interior,state,sellingprice
2015,Kia,Sorento,5,16639,white,black,ca,21500
2015,Kia,Sorento,5,16639,white,black,ca,21500
2014,BMW,3 Series,45,12345,gray,black,ca,30000
2016,Ford,F-150,,40000,red,tan,tx,25000
2013,Ford,Focus,30,60000,blue,black,tx,8000
";

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn full_run_cleans_queries_and_snapshots() {
    let csv = write_csv(LISTINGS);
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig::default()
        .with_output_dir(dir.path().join("out"))
        .with_charts(false);

    let result = run_analysis(csv.path(), &config).unwrap();

    assert_eq!(result.rows_read, 5);
    assert_eq!(result.duplicates_removed, 1);
    assert_eq!(result.rows_clean, 4);
    assert!(result.charts.is_none());

    // the lone missing condition gets the column median, computed before
    // the duplicate row is dropped: median of [5, 5, 45, 30] = 17.5
    let condition = result
        .null_resolutions
        .iter()
        .find(|resolution| resolution.column == "condition")
        .unwrap();
    assert_eq!(condition.action, NullAction::FilledMedian(17.5));

    // every role resolves against this header set
    assert!(result.schema.missing(&ALL_ROLES).is_empty());
    assert_eq!(result.year_range, Some((2013, 2016)));

    assert_eq!(result.queries.len(), 12);
    assert!(
        result
            .queries
            .iter()
            .all(|outcome| matches!(outcome.result, QueryResult::Report(_)))
    );

    let price_summary = result
        .queries
        .iter()
        .find(|outcome| outcome.name == "price-summary")
        .unwrap();
    match &price_summary.result {
        QueryResult::Report(QueryReport::PriceSummary {
            count, min, max, ..
        }) => {
            assert_eq!(*count, 4);
            assert_eq!(*min, Some(8000.0));
            assert_eq!(*max, Some(30000.0));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let snapshot = result.snapshot.unwrap();
    assert_eq!(snapshot, dir.path().join("out").join(SNAPSHOT_FILE));
    assert!(snapshot.is_file());
}

#[test]
fn missing_role_columns_skip_their_queries() {
    let csv = write_csv(
        "year,make,model,odometer,state,sellingprice\n\
         2015,Kia,Sorento,16639,ca,21500\n\
         2014,BMW,3 Series,12345,ca,30000\n",
    );
    let dir = TempDir::new().unwrap();
    let config = AnalysisConfig::default()
        .with_output_dir(dir.path().join("out"))
        .with_charts(false)
        .with_snapshot(false);

    let result = run_analysis(csv.path(), &config).unwrap();

    assert!(result.snapshot.is_none());
    let colors = result
        .queries
        .iter()
        .find(|outcome| outcome.name == "distinct-colors")
        .unwrap();
    assert!(matches!(colors.result, QueryResult::Skipped { .. }));

    // queries whose roles resolved still run
    let top_models = result
        .queries
        .iter()
        .find(|outcome| outcome.name == "top-models")
        .unwrap();
    assert!(matches!(top_models.result, QueryResult::Report(_)));
}
