//! Query engine: twelve read-only aggregation and filter operations over the
//! cleaned listings table, dispatched through declared role requirements.

pub mod group;
pub mod ops;
pub mod stats;

pub use ops::{
    QUERIES, QueryOutcome, QueryReport, QueryResult, QuerySpec, run_queries,
};
pub use stats::{Describe, describe, mean, median, quantile_linear, sample_std};
