//! CLI argument definitions for lotscope.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lotscope",
    version,
    about = "Used-car listings analysis - clean, query, and chart a CSV export",
    long_about = "Analyze a used-car listings CSV export.\n\n\
                  Cleans missing values and duplicate rows, runs the standard\n\
                  aggregation queries, and renders the report figures as PNG files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a listings CSV and write the report outputs.
    Analyze(AnalyzeArgs),

    /// List the semantic column roles and their matching keywords.
    Roles,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to the listings CSV file.
    #[arg(value_name = "CSV_PATH")]
    pub csv_path: PathBuf,

    /// Directory for charts and the cleaned snapshot (default: output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Read run settings from a JSON configuration file.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Reference year for the car-age computation.
    #[arg(long = "reference-year", value_name = "YEAR")]
    pub reference_year: Option<i32>,

    /// Skip chart rendering.
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// Skip writing the cleaned-table CSV snapshot.
    #[arg(long = "no-snapshot")]
    pub no_snapshot: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
