//! CSV ingestion for the lotscope pipeline.
//!
//! Reads a delimited listings export into a polars `DataFrame`, provides the
//! `AnyValue` conversion helpers the rest of the workspace leans on, and
//! profiles per-column missingness ahead of cleaning.

pub mod profile;
pub mod reader;
pub mod values;

pub use profile::{ColumnKind, ColumnProfile, missing_mask, profile_columns};
pub use reader::read_listings;
pub use values::{
    any_to_f64, any_to_string, cell_is_missing, column_string, format_numeric, parse_f64,
};
