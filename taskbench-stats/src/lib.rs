#![warn(missing_docs)]
//! Taskbench Statistics
//!
//! Timing statistics for harness runs. All samples are per-iteration elapsed
//! times in seconds.
//! - Linear-interpolated percentiles over raw samples
//! - Outlier detection via IQR or z-score
//! - Summary statistics separating cleaned central tendency from raw extremes

mod outliers;
mod percentiles;
mod summary;

pub use outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
pub use percentiles::{Percentiles, compute_percentile, compute_percentiles, median};
pub use summary::{SummaryStatistics, compute_summary};

/// Outlier percentage above which a sample set is considered noisy
pub const NOISY_OUTLIER_PCT: f64 = 10.0;
