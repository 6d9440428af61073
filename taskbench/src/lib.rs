#![warn(missing_docs)]
//! # Taskbench
//!
//! Four-phase task contract with a performance harness for timing it.
//!
//! - **Phase Guard**: Validate → Prepare → Execute → Finalize, enforced at runtime;
//!   out-of-order calls fail fast without reaching the task
//! - **Two Measurement Modes**: time the whole pipeline, or only Execute
//! - **Robust Aggregates**: median per-iteration time scaled by the iteration count
//! - **Budgets**: a total wall-clock cap checked between iterations; runs cut short are marked partial
//! - **Injected Clocks**: deterministic fake clocks for reproducible tests
//! - **Process Groups**: replicated tasks stop in lockstep on the coordinator's decision
//!
//! ## Quick Start
//!
//! ```ignore
//! use taskbench::prelude::*;
//!
//! let mut packet = DataPacket::new();
//! packet.push_input(&[1.0f64, 2.0, 3.0]).push_output::<f64>(1);
//!
//! let mut task = BoundTask::new(MyTask::default(), &mut packet);
//! assert!(task.validate()?);
//!
//! let mut harness = PerfHarness::wall_clock(10)?.with_budget(2.0)?;
//! let report = harness.run(&mut task, MeasureMode::ExecuteOnly)?;
//! report.render(&mut std::io::stdout())?;
//! ```
//!
//! ## Registering Tasks
//!
//! ```ignore
//! taskbench::internal::inventory::submit! {
//!     TaskDef {
//!         id: "my_task",
//!         description: "what it computes",
//!         make_packet: MyTask::packet,
//!         make_task: || Box::new(MyTask::default()),
//!         check: MyTask::check,
//!     }
//! }
//! ```

// Re-export core types
pub use taskbench_core::{
    BoundTask, COORDINATOR_RANK, Clock, DEFAULT_BUDGET_SECS, DataPacket, Error, ManualClock,
    MeasureMode, PerfHarness, PerfReport, PerfRun, Phase, ProcessGroup, Result, SoloGroup,
    StopReason, Task, TaskDef, TaskState, TransportError, broadcast_flag, monotonic_clock,
    step_clock,
};

// Re-export report types
pub use taskbench_report::{OutputFormat, SuiteReport, TaskStatus, generate_json_report};

// Re-export stats
pub use taskbench_stats::{OutlierMethod, SummaryStatistics, compute_summary, median};

/// Internal re-exports for task registration
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BoundTask, DataPacket, MeasureMode, PerfHarness, PerfReport, Phase, Task, TaskDef,
        TaskState,
    };
}

/// Run the Taskbench CLI.
///
/// Call this from a binary's `main()` to run every registered task:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     taskbench::run()
/// }
/// ```
pub use taskbench_cli::run;
