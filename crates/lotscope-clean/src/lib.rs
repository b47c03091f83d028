//! Cleaning stage: null-ratio policy, duplicate removal, snapshot.
//!
//! All operations are pure over the input frame and return a new one, so the
//! canonical table is never transiently inconsistent.

pub mod dedupe;
pub mod nulls;
pub mod snapshot;

pub use dedupe::drop_duplicate_rows;
pub use nulls::{NullAction, NullResolution, resolve_nulls};
pub use snapshot::write_snapshot;
