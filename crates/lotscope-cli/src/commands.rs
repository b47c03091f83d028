//! Subcommand entry points.

use anyhow::{Context, Result};
use comfy_table::Table;

use lotscope_cli::pipeline::run_analysis;
use lotscope_cli::types::AnalysisResult;
use lotscope_model::{ALL_ROLES, AnalysisConfig};

use crate::cli::AnalyzeArgs;
use crate::summary::apply_table_style;

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalysisResult> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = &args.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(year) = args.reference_year {
        config = config.with_reference_year(year);
    }
    if args.no_charts {
        config = config.with_charts(false);
    }
    if args.no_snapshot {
        config = config.with_snapshot(false);
    }
    run_analysis(&args.csv_path, &config)
}

pub fn run_roles() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Role", "Keywords"]);
    apply_table_style(&mut table);
    for role in ALL_ROLES {
        table.add_row(vec![role.name().to_string(), role.keywords().join(", ")]);
    }
    println!("{table}");
    Ok(())
}
