//! Task Executor
//!
//! Runs registered tasks and collects results.
//!
//! ## Pipeline Overview
//!
//! ```text
//! TaskDef (registered via inventory::submit!)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Validate, measure each mode, check outputs
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Compute summary stats (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build SuiteReport with per-mode summaries
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```

mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;

pub use execution::{ExecutionConfig, Executor, ModeExecution, TaskExecutionResult};
pub use formatting::{format_human_output, format_secs};
pub use report::build_report;
pub use statistics::{ModeStatistics, compute_statistics};
