//! Report Building
//!
//! Constructs the suite report from execution results.
//!
//! ## Pipeline
//!
//! ```text
//! TaskExecutionResult + ModeStatistics
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  Per-task results   │  ModeResult per completed mode
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │  Per-mode summary   │  Rayon-parallel stats over task aggregates
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │    SuiteReport      │  Ready for JSON or human output
//!   └─────────────────────┘
//! ```

use super::execution::{ExecutionConfig, TaskExecutionResult};
use super::metadata::build_report_meta;
use super::statistics::{ModeStatistics, find_statistics};
use rayon::prelude::*;
use taskbench_report::{
    FailureInfo, ModeMetrics, ModeResult, ModeSummary, ReportSummary, SuiteReport, TaskResult,
};
use taskbench_stats::{OutlierMethod, compute_summary};

/// Build a complete SuiteReport from execution results
///
/// # Arguments
/// * `results` - Task execution results
/// * `stats` - Pre-computed statistics for each measured mode
/// * `config` - Execution configuration (recorded in metadata)
/// * `total_duration_secs` - Total execution time in seconds
pub fn build_report(
    results: &[TaskExecutionResult],
    stats: &[ModeStatistics],
    config: &ExecutionConfig,
    total_duration_secs: f64,
) -> SuiteReport {
    let task_results: Vec<TaskResult> = results
        .iter()
        .map(|result| {
            let runs = result
                .modes
                .iter()
                .map(|m| {
                    let metrics = find_statistics(stats, &result.task_id, m.report.mode)
                        .map(ModeMetrics::from)
                        .unwrap_or_default();
                    ModeResult::new(&m.report, metrics, m.output_valid)
                })
                .collect();

            let failure = result.error_message.as_ref().map(|msg| FailureInfo {
                kind: result
                    .failure_kind
                    .clone()
                    .unwrap_or_else(|| "panic".to_string()),
                message: msg.clone(),
                mode: result.failed_mode,
            });

            TaskResult {
                id: result.task_id.clone(),
                description: result.description.clone(),
                status: result.status,
                runs,
                failure,
            }
        })
        .collect();

    // Aggregates of the same mode across tasks
    let modes: Vec<ModeSummary> = config
        .modes
        .par_iter()
        .filter_map(|&mode| {
            let runs: Vec<&ModeResult> = task_results
                .iter()
                .flat_map(|r| r.runs.iter())
                .filter(|run| run.mode == mode)
                .collect();
            if runs.is_empty() {
                return None;
            }
            let aggregates: Vec<f64> = runs.iter().map(|run| run.aggregate_secs).collect();
            let summary = compute_summary(&aggregates, OutlierMethod::default());
            Some(ModeSummary {
                mode,
                tasks: runs.len(),
                partial_runs: runs.iter().filter(|run| run.partial).count(),
                metrics: ModeMetrics::from(&summary),
            })
        })
        .collect();

    let summary = ReportSummary::tally(&task_results, total_duration_secs);

    SuiteReport {
        meta: build_report_meta(config),
        results: task_results,
        modes,
        summary,
    }
}
