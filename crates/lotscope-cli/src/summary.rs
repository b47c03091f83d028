//! Terminal summary of an analysis run.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lotscope_cli::types::AnalysisResult;
use lotscope_clean::NullAction;
use lotscope_ingest::format_numeric;
use lotscope_model::ALL_ROLES;
use lotscope_query::{Describe, QueryOutcome, QueryReport, QueryResult};
use lotscope_report::ChartOutcomes;

pub fn print_summary(result: &AnalysisResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.snapshot {
        println!("Cleaned snapshot: {}", path.display());
    }
    println!(
        "Rows: {} read, {} duplicates removed, {} analyzed",
        result.rows_read, result.duplicates_removed, result.rows_clean
    );
    if let Some((first, last)) = result.year_range {
        println!("Model years: {first} to {last}");
    }

    print_column_table(result);
    print_role_table(result);
    for outcome in &result.queries {
        print_query(outcome);
    }
    if let Some(charts) = &result.charts {
        print_charts(charts);
    }
    print_headlines(result);
}

fn print_column_table(result: &AnalysisResult) {
    println!("\nColumns:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Missing"),
        header_cell("Ratio"),
        header_cell("Resolution"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for profile in &result.raw_profiles {
        let resolution = result
            .null_resolutions
            .iter()
            .find(|resolution| resolution.column == profile.name);
        let action_cell = match resolution.map(|r| &r.action) {
            Some(NullAction::DroppedColumn) => Cell::new("dropped").fg(Color::Red),
            Some(NullAction::FilledMedian(value)) => {
                Cell::new(format!("filled median {}", format_numeric(*value)))
            }
            Some(NullAction::FilledMode(value)) => Cell::new(format!("filled mode {value}")),
            Some(NullAction::FilledPlaceholder(value)) => Cell::new(format!("filled {value}")),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&profile.name),
            Cell::new(format!("{:?}", profile.kind)),
            Cell::new(profile.missing),
            Cell::new(format!("{:.1}%", profile.null_ratio() * 100.0)),
            action_cell,
        ]);
    }
    println!("{table}");
}

fn print_role_table(result: &AnalysisResult) {
    println!("\nResolved roles:");
    let mut table = Table::new();
    table.set_header(vec![header_cell("Role"), header_cell("Column")]);
    apply_table_style(&mut table);
    for role in ALL_ROLES {
        let cell = match result.schema.column(role) {
            Some(column) => Cell::new(column),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(role.name()), cell]);
    }
    println!("{table}");
}

fn print_query(outcome: &QueryOutcome) {
    println!("\n{}", outcome.title);
    let report = match &outcome.result {
        QueryResult::Skipped { missing } => {
            let names: Vec<&str> = missing.iter().map(|role| role.name()).collect();
            println!("  skipped: no column for {}", names.join(", "));
            return;
        }
        QueryResult::Report(report) => report,
    };
    match report {
        QueryReport::PriceSummary {
            count,
            mean,
            min,
            max,
        } => {
            println!(
                "  count {count}, mean {}, min {}, max {}",
                fmt_opt(*mean),
                fmt_opt(*min),
                fmt_opt(*max)
            );
        }
        QueryReport::DistinctColors { values } => {
            println!("  {} colors: {}", values.len(), values.join(", "));
        }
        QueryReport::BrandModelCounts {
            brands,
            models,
            brand_sample,
            model_sample,
        } => {
            println!("  {brands} brands, {models} models");
            println!("  brands: {}", brand_sample.join(", "));
            println!("  models: {}", model_sample.join(", "));
        }
        QueryReport::FilteredRows { count, sample } => {
            println!("  matching rows: {count}");
            for row in sample {
                println!("    {row}");
            }
        }
        QueryReport::TopModels { entries } => {
            print_pair_table("Model", "Listings", entries.iter().map(count_pair));
        }
        QueryReport::GroupedValues {
            value_label,
            groups,
        } => {
            print_pair_table("Group", value_label, groups.iter().map(value_pair));
        }
        QueryReport::CarAge {
            reference_year,
            stats,
        } => {
            println!("  reference year {reference_year}");
            match stats {
                Some(stats) => print_describe(stats),
                None => println!("  no usable year values"),
            }
        }
        QueryReport::StatePrices { groups } => {
            print_pair_table("State", "Mean price", groups.iter().map(value_pair));
        }
        QueryReport::ValueForMoney {
            threshold,
            cohort,
            groups,
        } => {
            println!(
                "  condition threshold {}, cohort of {cohort} listings",
                fmt_opt(*threshold)
            );
            print_pair_table("Brand", "Mean price", groups.iter().map(value_pair));
        }
    }
}

fn print_describe(stats: &Describe) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stat"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("count", stats.count.to_string()),
        ("mean", format_numeric(stats.mean)),
        (
            "std",
            stats.std.map_or_else(|| "-".to_string(), format_numeric),
        ),
        ("min", format_numeric(stats.min)),
        ("25%", format_numeric(stats.q25)),
        ("50%", format_numeric(stats.median)),
        ("75%", format_numeric(stats.q75)),
        ("max", format_numeric(stats.max)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("{table}");
}

fn print_charts(charts: &ChartOutcomes) {
    println!("\nFigures:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Status"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    for chart in &charts.rendered {
        table.add_row(vec![
            Cell::new(chart.file_name),
            Cell::new("rendered").fg(Color::Green),
            Cell::new(chart.path.display().to_string()),
        ]);
    }
    for chart in &charts.skipped {
        table.add_row(vec![
            Cell::new(chart.file_name),
            Cell::new("skipped").fg(Color::Yellow),
            Cell::new(&chart.reason),
        ]);
    }
    println!("{table}");
}

fn print_headlines(result: &AnalysisResult) {
    if let Some(change) = result.charts.as_ref().and_then(|charts| charts.price_change_pct) {
        println!(
            "\nMean price changed {change:+.1}% from the earliest to the latest model year"
        );
    }
    let top_state = result.queries.iter().find_map(|outcome| match &outcome.result {
        QueryResult::Report(QueryReport::StatePrices { groups }) => groups.first(),
        _ => None,
    });
    if let Some((state, price)) = top_state {
        println!(
            "Highest mean price for newer cars: {state} at {}",
            format_numeric(*price)
        );
    }
}

fn print_pair_table<'a, I>(key_header: &str, value_header: &str, rows: I)
where
    I: Iterator<Item = (&'a str, String)>,
{
    let mut table = Table::new();
    table.set_header(vec![header_cell(key_header), header_cell(value_header)]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    println!("{table}");
}

fn count_pair(entry: &(String, usize)) -> (&str, String) {
    (entry.0.as_str(), entry.1.to_string())
}

fn value_pair(entry: &(String, f64)) -> (&str, String) {
    (entry.0.as_str(), format_numeric(entry.1))
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_numeric)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
