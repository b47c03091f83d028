//! Data model for the lotscope analysis pipeline.
//!
//! Defines the semantic column roles, the resolved schema built once after
//! ingestion, and the run configuration with its documented defaults.

pub mod config;
pub mod roles;

pub use config::{AnalysisConfig, ConfigError};
pub use roles::{ALL_ROLES, ResolvedSchema, Role};
