#![warn(missing_docs)]
//! Taskbench Core - Task Lifecycle and Harness
//!
//! This crate provides the pieces every benchmarked task is built from:
//! - `DataPacket` byte buffers exchanged between caller and task
//! - `Task` four-phase contract and the `BoundTask` phase guard
//! - `PerfHarness` repeated, budgeted timing in two measurement modes
//! - `ProcessGroup` transport abstraction for replicated tasks

mod clock;
mod error;
mod group;
mod harness;
mod packet;
mod task;

pub use clock::{Clock, ManualClock, monotonic_clock, step_clock};
pub use error::{Error, Result};
pub use group::{COORDINATOR_RANK, ProcessGroup, SoloGroup, TransportError, broadcast_flag};
pub use harness::{
    DEFAULT_BUDGET_SECS, MeasureMode, PerfHarness, PerfReport, PerfRun, StopReason,
};
pub use packet::DataPacket;
pub use task::{BoundTask, Phase, Task, TaskState};

/// Task definition registered with `inventory::submit!`
#[derive(Debug, Clone, Copy)]
pub struct TaskDef {
    /// Unique identifier
    pub id: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Build an input packet for a problem of the given size
    pub make_packet: fn(usize) -> DataPacket,
    /// Construct a fresh task instance
    pub make_task: fn() -> Box<dyn Task>,
    /// Check the outputs written by Finalize against the inputs
    pub check: fn(&DataPacket) -> bool,
}

impl TaskDef {
    /// Look up a registered task by id
    pub fn find(id: &str) -> Option<&'static TaskDef> {
        inventory::iter::<TaskDef>.into_iter().find(|def| def.id == id)
    }
}

// Collect all registered tasks
inventory::collect!(TaskDef);
