//! Statistics Computation
//!
//! Parallel computation of summary statistics for measured tasks.
//!
//! Uses Rayon to parallelize across every (task, mode) pair. Each pair's
//! per-iteration timings are processed independently to compute:
//! - Central tendency (mean, median)
//! - Dispersion (std dev, min, max)
//! - Percentiles (p90, p95, p99)
//! - Outlier detection via IQR method

use super::execution::TaskExecutionResult;
use rayon::prelude::*;
use taskbench_core::MeasureMode;
use taskbench_stats::{OutlierMethod, SummaryStatistics, compute_summary};

/// Statistics for one measured mode of one task
#[derive(Debug, Clone)]
pub struct ModeStatistics {
    pub task_id: String,
    pub mode: MeasureMode,
    pub stats: SummaryStatistics,
}

/// Compute statistics for every completed mode (parallelized with Rayon)
///
/// Modes that recorded no iterations are skipped.
pub fn compute_statistics(results: &[TaskExecutionResult]) -> Vec<ModeStatistics> {
    results
        .par_iter()
        .flat_map_iter(|r| r.modes.iter().map(move |m| (r, m)))
        .filter(|(_, m)| !m.report.runs.is_empty())
        .map(|(r, m)| ModeStatistics {
            task_id: r.task_id.clone(),
            mode: m.report.mode,
            stats: compute_summary(&m.report.samples(), OutlierMethod::default()),
        })
        .collect()
}

/// Find the statistics for `task_id` in `mode`
pub fn find_statistics<'a>(
    stats: &'a [ModeStatistics],
    task_id: &str,
    mode: MeasureMode,
) -> Option<&'a SummaryStatistics> {
    stats
        .iter()
        .find(|s| s.task_id == task_id && s.mode == mode)
        .map(|s| &s.stats)
}
