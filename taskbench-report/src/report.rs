//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskbench_core::{MeasureMode, PerfReport, StopReason};
use taskbench_stats::{NOISY_OUTLIER_PCT, SummaryStatistics};

/// Complete suite report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// One entry per selected task
    pub results: Vec<TaskResult>,
    /// Per-mode statistics across every measured task
    pub modes: Vec<ModeSummary>,
    /// Status counts
    pub summary: ReportSummary,
}

impl SuiteReport {
    /// Whether any task failed or crashed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0 || self.summary.crashed > 0
    }

    /// Look up a task result by id
    pub fn result(&self, id: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.id == id)
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub config: ReportConfig,
}

/// Harness configuration captured in report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Requested timed iterations per mode
    pub iterations: u64,
    /// Untimed warmup iterations per mode
    pub warmup: u64,
    /// Total budget per mode; `None` when unlimited
    pub budget_secs: Option<f64>,
    /// Problem size handed to task packet builders
    pub size: usize,
    /// Modes measured, in order
    pub modes: Vec<MeasureMode>,
}

/// Individual task result in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    /// Completed measurements, one per mode
    pub runs: Vec<ModeResult>,
    pub failure: Option<FailureInfo>,
}

/// Task execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Every mode measured and the outputs checked out
    Passed,
    /// A phase faulted or the outputs were wrong
    Failed,
    /// Validation refused the input packet
    Rejected,
    /// The task panicked
    Crashed,
}

impl TaskStatus {
    /// Short label for terminal output
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Passed => "passed",
            TaskStatus::Failed => "failed",
            TaskStatus::Rejected => "rejected",
            TaskStatus::Crashed => "crashed",
        }
    }
}

/// One measured mode of one task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeResult {
    pub mode: MeasureMode,
    pub iterations_requested: u64,
    pub iterations_run: u64,
    /// Median per-iteration seconds times iterations run
    pub aggregate_secs: f64,
    pub partial: bool,
    pub stop_reason: StopReason,
    /// Whether Finalize produced the expected outputs
    pub output_valid: bool,
    pub metrics: ModeMetrics,
}

impl ModeResult {
    /// Build from a harness report and precomputed metrics
    pub fn new(report: &PerfReport, metrics: ModeMetrics, output_valid: bool) -> Self {
        Self {
            mode: report.mode,
            iterations_requested: report.iterations_requested,
            iterations_run: report.iterations_run,
            aggregate_secs: report.aggregate_secs,
            partial: report.partial,
            stop_reason: report.stop_reason,
            output_valid,
            metrics,
        }
    }
}

/// Timing metrics over per-iteration seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeMetrics {
    pub samples: usize,
    pub mean_secs: f64,
    pub median_secs: f64,
    pub std_dev_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
    pub p90_secs: f64,
    pub p95_secs: f64,
    pub p99_secs: f64,
    pub outliers: usize,
    /// Coefficient of variation in percent
    pub cv: f64,
    /// Whether outliers exceed the noise threshold
    pub noisy: bool,
}

impl From<&SummaryStatistics> for ModeMetrics {
    fn from(stats: &SummaryStatistics) -> Self {
        Self {
            samples: stats.sample_count,
            mean_secs: stats.mean,
            median_secs: stats.median,
            std_dev_secs: stats.std_dev,
            min_secs: stats.min,
            max_secs: stats.max,
            p90_secs: stats.percentiles.p90,
            p95_secs: stats.percentiles.p95,
            p99_secs: stats.percentiles.p99,
            outliers: stats.outlier_count,
            cv: stats.coefficient_of_variation(),
            noisy: stats.outlier_analysis.is_noisy(NOISY_OUTLIER_PCT),
        }
    }
}

/// Statistics of one mode across tasks, computed over per-task aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeSummary {
    pub mode: MeasureMode,
    /// Tasks that completed this mode
    pub tasks: usize,
    /// Runs cut short by the budget or coordinator
    pub partial_runs: usize,
    pub metrics: ModeMetrics,
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// `fault`, `rejected`, `output`, `contract` or `panic`
    pub kind: String,
    pub message: String,
    /// Mode being measured when the failure happened
    pub mode: Option<MeasureMode>,
}

/// Report summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_tasks: usize,
    pub passed: usize,
    pub failed: usize,
    pub rejected: usize,
    pub crashed: usize,
    pub partial_runs: usize,
    pub total_duration_secs: f64,
}

impl ReportSummary {
    /// Count statuses and partial runs over `results`
    pub fn tally(results: &[TaskResult], total_duration_secs: f64) -> Self {
        let mut summary = Self {
            total_tasks: results.len(),
            total_duration_secs,
            ..Default::default()
        };
        for result in results {
            match result.status {
                TaskStatus::Passed => summary.passed += 1,
                TaskStatus::Failed => summary.failed += 1,
                TaskStatus::Rejected => summary.rejected += 1,
                TaskStatus::Crashed => summary.crashed += 1,
            }
            summary.partial_runs += result.runs.iter().filter(|r| r.partial).count();
        }
        summary
    }
}
