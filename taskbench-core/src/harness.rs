//! Performance Harness
//!
//! Drives a validated [`BoundTask`] through repeated timed iterations.
//!
//! ## Modes
//!
//! - **Full pipeline**: every timed iteration is prepare → execute → finalize.
//! - **Execute only**: prepare once, time each execute, finalize once.
//!
//! ## Timing
//!
//! Each timed iteration takes exactly two clock readings. The reported
//! aggregate is the median per-iteration time scaled by the number of
//! iterations run, so one cold-start or preempted iteration cannot skew it.
//!
//! ## Budget
//!
//! The total budget is checked at iteration boundaries against the stop
//! reading. When it is exhausted the remaining iterations are skipped and the
//! report is marked partial. A running iteration is never interrupted.
//!
//! ## Lockstep
//!
//! With a process group of more than one rank attached, every iteration
//! boundary, warmup included, takes the coordinator's stop decision so all
//! ranks call the same phases the same number of times.

use crate::clock::{Clock, monotonic_clock};
use crate::error::{Error, Result};
use crate::group::{ProcessGroup, broadcast_flag};
use crate::task::{BoundTask, Phase, Task};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;
use std::str::FromStr;
use taskbench_stats::{OutlierMethod, SummaryStatistics, compute_summary, median};
use tracing::{debug, info, warn};

/// Upper bound on the run records reserved before measuring
const RESERVED_RUNS: u64 = 1024;

/// Default total measurement budget in seconds
pub const DEFAULT_BUDGET_SECS: f64 = 10.0;

/// Which phases are inside the timed region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureMode {
    /// Prepare, execute and finalize are timed on every iteration
    FullPipeline,
    /// Only execute is timed; prepare and finalize run once outside timing
    ExecuteOnly,
}

impl MeasureMode {
    /// Both modes, full pipeline first
    pub const ALL: [MeasureMode; 2] = [MeasureMode::FullPipeline, MeasureMode::ExecuteOnly];

    /// Phases run inside one timed iteration
    pub fn timed_phases(self) -> &'static [Phase] {
        match self {
            MeasureMode::FullPipeline => &[Phase::Prepare, Phase::Execute, Phase::Finalize],
            MeasureMode::ExecuteOnly => &[Phase::Execute],
        }
    }

    /// Stable identifier used in reports and configuration
    pub fn as_str(self) -> &'static str {
        match self {
            MeasureMode::FullPipeline => "full-pipeline",
            MeasureMode::ExecuteOnly => "execute-only",
        }
    }
}

impl fmt::Display for MeasureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasureMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full-pipeline" | "pipeline" | "full" => Ok(MeasureMode::FullPipeline),
            "execute-only" | "execute" | "task" => Ok(MeasureMode::ExecuteOnly),
            other => Err(format!("Unknown measurement mode: {}", other)),
        }
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// All requested iterations ran
    Completed,
    /// The total budget ran out first
    BudgetExceeded,
    /// The coordinating instance stopped the group
    CoordinatorStopped,
}

impl StopReason {
    /// Short description for terminal output
    pub fn describe(self) -> &'static str {
        match self {
            StopReason::Completed => "completed",
            StopReason::BudgetExceeded => "budget exceeded",
            StopReason::CoordinatorStopped => "stopped by coordinator",
        }
    }
}

/// One timed iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerfRun {
    /// Zero-based index among timed iterations
    pub index: u64,
    /// Elapsed seconds between the two clock readings
    pub elapsed_secs: f64,
    /// Mode the iteration ran in
    pub mode: MeasureMode,
}

/// Result of [`PerfHarness::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfReport {
    /// Task name
    pub task: String,
    /// Measurement mode
    pub mode: MeasureMode,
    /// Iterations the harness was configured for
    pub iterations_requested: u64,
    /// Timed iterations actually completed
    pub iterations_run: u64,
    /// Median per-iteration seconds times `iterations_run`
    pub aggregate_secs: f64,
    /// Whether iterations were skipped
    pub partial: bool,
    /// Why the run stopped
    pub stop_reason: StopReason,
    /// Seconds from the first to the last clock reading, untimed phases included
    pub wall_secs: f64,
    /// Per-iteration timings in order
    pub runs: Vec<PerfRun>,
}

impl PerfReport {
    /// Per-iteration elapsed seconds
    pub fn samples(&self) -> Vec<f64> {
        self.runs.iter().map(|r| r.elapsed_secs).collect()
    }

    /// Median per-iteration seconds
    pub fn median_secs(&self) -> f64 {
        median(&self.samples())
    }

    /// Summary statistics over the per-iteration timings
    pub fn summary(&self) -> SummaryStatistics {
        compute_summary(&self.samples(), OutlierMethod::default())
    }

    /// Write the fixed-format summary to `sink`
    pub fn render<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        writeln!(sink, "{}:{}:{:.9}", self.task, self.mode, self.aggregate_secs)?;
        writeln!(
            sink,
            "  iterations: {}/{}",
            self.iterations_run, self.iterations_requested
        )?;
        writeln!(sink, "  per-iteration median: {:.9} s", self.median_secs())?;
        if self.partial {
            writeln!(sink, "  partial: {}", self.stop_reason.describe())?;
        }
        Ok(())
    }
}

/// Repeated-execution timing driver
pub struct PerfHarness {
    requested_iterations: u64,
    warmup_iterations: u64,
    budget_secs: Option<f64>,
    clock: Clock,
    group: Option<Rc<dyn ProcessGroup>>,
}

impl PerfHarness {
    /// Configure a harness for `requested_iterations` timed iterations read from `clock`.
    ///
    /// The budget defaults to [`DEFAULT_BUDGET_SECS`] and warmup to zero.
    pub fn configure(
        requested_iterations: u64,
        clock: impl FnMut() -> f64 + 'static,
    ) -> Result<Self> {
        if requested_iterations == 0 {
            return Err(Error::InvalidConfig(
                "requested iterations must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            requested_iterations,
            warmup_iterations: 0,
            budget_secs: Some(DEFAULT_BUDGET_SECS),
            clock: Box::new(clock),
            group: None,
        })
    }

    /// Configure a harness reading the monotonic wall clock
    pub fn wall_clock(requested_iterations: u64) -> Result<Self> {
        Self::configure(requested_iterations, monotonic_clock())
    }

    /// Cap total measurement time at `secs`
    pub fn with_budget(mut self, secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "budget must be a positive number of seconds, got {}",
                secs
            )));
        }
        self.budget_secs = Some(secs);
        Ok(self)
    }

    /// Remove the total budget
    pub fn without_budget(mut self) -> Self {
        self.budget_secs = None;
        self
    }

    /// Run `iterations` untimed iterations before measuring
    pub fn with_warmup(mut self, iterations: u64) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    /// Keep every process of `group` in lockstep
    pub fn with_group(mut self, group: Rc<dyn ProcessGroup>) -> Self {
        self.group = Some(group);
        self
    }

    /// Configured timed iterations
    pub fn requested_iterations(&self) -> u64 {
        self.requested_iterations
    }

    /// Configured warmup iterations
    pub fn warmup_iterations(&self) -> u64 {
        self.warmup_iterations
    }

    /// Configured budget in seconds
    pub fn budget_secs(&self) -> Option<f64> {
        self.budget_secs
    }

    /// Measure `task` in `mode`.
    ///
    /// Fails with [`Error::NotValidated`] before touching the task if it has not
    /// passed validation, and with [`Error::TaskFault`] as soon as any phase
    /// returns `false`. No statistics survive a fault.
    pub fn run<T: Task>(&mut self, task: &mut BoundTask<'_, T>, mode: MeasureMode) -> Result<PerfReport> {
        if !task.is_validated() {
            warn!(task = task.name(), "refusing to measure unvalidated task");
            return Err(Error::NotValidated {
                task: task.name().to_string(),
            });
        }

        let requested = self.requested_iterations;
        let start = (self.clock)();
        let mut iteration: u64 = 0;

        if mode == MeasureMode::ExecuteOnly {
            step(task, Phase::Prepare, iteration)?;
        }

        for _ in 0..self.warmup_iterations {
            for &phase in mode.timed_phases() {
                step(task, phase, iteration)?;
            }
            iteration += 1;
            let over = self.over_budget(start);
            if self.should_stop(over)?.is_some() {
                debug!(task = task.name(), "warmup cut short");
                break;
            }
        }

        let mut runs = Vec::with_capacity(requested.min(RESERVED_RUNS) as usize);
        let mut stop_reason = StopReason::Completed;

        for index in 0..requested {
            let t0 = (self.clock)();
            for &phase in mode.timed_phases() {
                step(task, phase, iteration)?;
            }
            let t1 = (self.clock)();
            iteration += 1;

            let elapsed_secs = (t1 - t0).max(0.0);
            runs.push(PerfRun {
                index,
                elapsed_secs,
                mode,
            });
            debug!(task = task.name(), %mode, index, elapsed_secs, "iteration complete");

            if index + 1 == requested {
                break;
            }
            let over = self.budget_secs.is_some_and(|budget| t1 - start >= budget);
            if let Some(reason) = self.should_stop(over)? {
                stop_reason = reason;
                break;
            }
        }

        if mode == MeasureMode::ExecuteOnly {
            step(task, Phase::Finalize, iteration)?;
        }
        let wall_secs = ((self.clock)() - start).max(0.0);

        let iterations_run = runs.len() as u64;
        let samples: Vec<f64> = runs.iter().map(|r| r.elapsed_secs).collect();
        let aggregate_secs = median(&samples) * iterations_run as f64;
        let partial = iterations_run < requested;

        if partial {
            warn!(
                task = task.name(),
                %mode,
                iterations_run,
                requested,
                "measurement stopped early: {:?}",
                stop_reason
            );
        }
        info!(task = task.name(), %mode, iterations_run, aggregate_secs, "measurement complete");

        Ok(PerfReport {
            task: task.name().to_string(),
            mode,
            iterations_requested: requested,
            iterations_run,
            aggregate_secs,
            partial,
            stop_reason,
            wall_secs,
            runs,
        })
    }

    fn over_budget(&mut self, start: f64) -> bool {
        match self.budget_secs {
            Some(budget) => (self.clock)() - start >= budget,
            None => false,
        }
    }

    /// Local stop decision, replaced by the coordinator's when running in a group
    fn should_stop(&self, over_budget: bool) -> Result<Option<StopReason>> {
        let group = match &self.group {
            Some(group) if group.size() > 1 => group,
            _ => return Ok(over_budget.then_some(StopReason::BudgetExceeded)),
        };

        let stop = broadcast_flag(group.as_ref(), over_budget)?;
        Ok(match (stop, group.is_coordinator()) {
            (false, _) => None,
            (true, true) => Some(StopReason::BudgetExceeded),
            (true, false) => Some(StopReason::CoordinatorStopped),
        })
    }
}

impl fmt::Debug for PerfHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerfHarness")
            .field("requested_iterations", &self.requested_iterations)
            .field("warmup_iterations", &self.warmup_iterations)
            .field("budget_secs", &self.budget_secs)
            .field("group_size", &self.group.as_ref().map(|g| g.size()))
            .finish()
    }
}

fn step<T: Task>(task: &mut BoundTask<'_, T>, phase: Phase, iteration: u64) -> Result<()> {
    if task.invoke(phase)? {
        Ok(())
    } else {
        Err(Error::TaskFault { phase, iteration })
    }
}
