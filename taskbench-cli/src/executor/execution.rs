//! Task Execution
//!
//! Runs each selected task through the harness once per configured mode.
//!
//! ## Data Flow
//!
//! ```text
//! TaskDef (from inventory)
//!        │
//!        ▼
//!   make_packet(size) + make_task()
//!        │
//!        ▼
//! ┌──────────────────┐
//! │   BoundTask      │  Validate once
//! └────────┬─────────┘
//!          │  per mode
//!          ▼
//! ┌──────────────────┐
//! │   PerfHarness    │  Warmup → timed iterations → PerfReport
//! └────────┬─────────┘
//!          │
//!          ▼
//!  check(packet) → TaskExecutionResult
//! ```
//!
//! A task that panics is caught and reported as crashed; the remaining
//! tasks still run.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use taskbench_core::{BoundTask, Error, MeasureMode, PerfHarness, PerfReport, TaskDef};
use taskbench_report::TaskStatus;
use tracing::{debug, warn};

/// Configuration for task execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Timed iterations per mode
    pub iterations: u64,
    /// Untimed warmup iterations per mode
    pub warmup: u64,
    /// Total budget per mode in seconds; `None` when unlimited
    pub budget_secs: Option<f64>,
    /// Problem size handed to `make_packet`
    pub size: usize,
    /// Modes to measure, in order
    pub modes: Vec<MeasureMode>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            warmup: 0,
            budget_secs: Some(taskbench_core::DEFAULT_BUDGET_SECS),
            size: 1000,
            modes: MeasureMode::ALL.to_vec(),
        }
    }
}

impl ExecutionConfig {
    /// Harness on the wall clock with this configuration
    pub fn harness(&self) -> taskbench_core::Result<PerfHarness> {
        let harness = PerfHarness::wall_clock(self.iterations)?.with_warmup(self.warmup);
        match self.budget_secs {
            Some(secs) => harness.with_budget(secs),
            None => Ok(harness.without_budget()),
        }
    }
}

/// One completed mode
#[derive(Debug, Clone)]
pub struct ModeExecution {
    pub report: PerfReport,
    /// Result of the task's output check after this mode
    pub output_valid: bool,
}

/// Result from executing a single task
#[derive(Debug, Clone)]
pub struct TaskExecutionResult {
    pub task_id: String,
    pub description: String,
    pub status: TaskStatus,
    pub modes: Vec<ModeExecution>,
    pub duration_secs: f64,
    pub failure_kind: Option<String>,
    pub error_message: Option<String>,
    /// Mode being measured when the task failed
    pub failed_mode: Option<MeasureMode>,
}

impl TaskExecutionResult {
    fn new(def: &TaskDef) -> Self {
        Self {
            task_id: def.id.to_string(),
            description: def.description.to_string(),
            status: TaskStatus::Passed,
            modes: Vec::new(),
            duration_secs: 0.0,
            failure_kind: None,
            error_message: None,
            failed_mode: None,
        }
    }

    fn fail(
        mut self,
        status: TaskStatus,
        kind: &str,
        message: String,
        mode: Option<MeasureMode>,
    ) -> Self {
        self.status = status;
        self.failure_kind = Some(kind.to_string());
        self.error_message = Some(message);
        self.failed_mode = mode;
        self
    }
}

/// Execute tasks and produce results
pub struct Executor {
    config: ExecutionConfig,
    results: Vec<TaskExecutionResult>,
}

impl Executor {
    pub fn new(config: ExecutionConfig) -> Self {
        Self {
            config,
            results: Vec::new(),
        }
    }

    /// Execute all provided tasks
    pub fn execute(&mut self, tasks: &[&TaskDef]) -> Vec<TaskExecutionResult> {
        let pb = ProgressBar::new(tasks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for def in tasks {
            pb.set_message(def.id.to_string());
            let result = self.execute_single(def);
            self.results.push(result);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        std::mem::take(&mut self.results)
    }

    /// Execute a single task
    pub fn execute_single(&self, def: &TaskDef) -> TaskExecutionResult {
        let start = Instant::now();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.measure(def)
        }));

        let duration_secs = start.elapsed().as_secs_f64();

        let mut result = match result {
            Ok(result) => result,
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                warn!(task = def.id, "task panicked: {}", message);
                TaskExecutionResult::new(def).fail(TaskStatus::Crashed, "panic", message, None)
            }
        };
        result.duration_secs = duration_secs;
        result
    }

    fn measure(&self, def: &TaskDef) -> TaskExecutionResult {
        let result = TaskExecutionResult::new(def);
        let mut packet = (def.make_packet)(self.config.size);
        let mut task = BoundTask::new((def.make_task)(), &mut packet);

        match task.validate() {
            Ok(true) => {}
            Ok(false) => {
                let message = format!("input packet rejected for size {}", self.config.size);
                return result.fail(TaskStatus::Rejected, "rejected", message, None);
            }
            Err(e) => return result.fail(TaskStatus::Failed, failure_kind(&e), e.to_string(), None),
        }

        let mut result = result;
        for &mode in &self.config.modes {
            let outcome = self
                .config
                .harness()
                .and_then(|mut harness| harness.run(&mut task, mode));

            let report = match outcome {
                Ok(report) => report,
                Err(e) => {
                    return result.fail(TaskStatus::Failed, failure_kind(&e), e.to_string(), Some(mode));
                }
            };

            let output_valid = (def.check)(task.packet());
            debug!(task = def.id, %mode, output_valid, "mode measured");
            result.modes.push(ModeExecution {
                report,
                output_valid,
            });

            if !output_valid {
                let message = format!("outputs failed verification after {} run", mode);
                return result.fail(TaskStatus::Failed, "output", message, Some(mode));
            }
        }

        result
    }
}

fn failure_kind(error: &Error) -> &'static str {
    match error {
        Error::TaskFault { .. } => "fault",
        Error::PhaseOrder { .. } | Error::NotValidated { .. } => "contract",
        Error::InvalidConfig(_) => "config",
        Error::Transport(_) => "transport",
    }
}
