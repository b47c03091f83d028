//! Report rendering: interval binning, correlation, and the ten PNG figures
//! the analysis emits.

pub mod bins;
pub mod charts;
pub mod correlation;
pub mod numeric;

pub use bins::BinSpec;
pub use charts::{ChartOutcomes, RenderedChart, SkippedChart, render_all};
pub use correlation::{CorrelationMatrix, correlation_matrix};
pub use numeric::{BoxStats, linear_fit, pearson};
