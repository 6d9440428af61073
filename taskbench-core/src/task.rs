//! Task Lifecycle
//!
//! A [`Task`] supplies the four phase bodies. [`BoundTask`] binds a task to the
//! caller's [`DataPacket`] and enforces the call order:
//!
//! ```text
//!  Idle ──validate──▶ Validated ──prepare──▶ Prepared ──execute──▶ Executed ──finalize──▶ Finalized
//!                      │  ▲                     ▲                    │  ▲                    │
//!                      └──┘ validate            │                    └──┘ execute            │
//!                                               └─────────────── prepare ────────────────────┘
//! ```
//!
//! Out-of-order calls return [`Error::PhaseOrder`] without reaching the task.

use crate::error::{Error, Result};
use crate::packet::DataPacket;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Check packet shape and values
    Validate,
    /// Copy inputs into working state
    Prepare,
    /// Compute on working state
    Execute,
    /// Write results to output buffers
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validate => "validate",
            Phase::Prepare => "prepare",
            Phase::Execute => "execute",
            Phase::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Phase-state marker held by a [`BoundTask`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Not validated yet, or last validation failed
    #[default]
    Idle,
    /// Validation succeeded; working state not initialised
    Validated,
    /// Working state initialised from the packet
    Prepared,
    /// At least one execute completed on the current working state
    Executed,
    /// Results written; a new cycle may start at prepare
    Finalized,
}

impl TaskState {
    /// State reached when `phase` succeeds from `self`, or `None` if the call is illegal
    pub fn next(self, phase: Phase) -> Option<TaskState> {
        use Phase::*;
        use TaskState::*;
        match (self, phase) {
            (Idle | Validated, Validate) => Some(Validated),
            (Validated | Finalized, Prepare) => Some(Prepared),
            (Prepared | Executed, Execute) => Some(Executed),
            (Executed, Finalize) => Some(Finalized),
            _ => None,
        }
    }

    /// State a failed `phase` falls back to
    fn on_failure(phase: Phase) -> TaskState {
        match phase {
            Phase::Validate => TaskState::Idle,
            Phase::Prepare | Phase::Execute | Phase::Finalize => TaskState::Validated,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Idle => "idle",
            TaskState::Validated => "validated",
            TaskState::Prepared => "prepared",
            TaskState::Executed => "executed",
            TaskState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Phase bodies of a computational task.
///
/// Each method returns `true` on success. Working state belongs to the
/// implementor and is touched only from these methods. `execute` receives no
/// packet: everything it needs must have been captured by `prepare`.
///
/// Distributed tasks take their [`ProcessGroup`](crate::ProcessGroup) at
/// construction; non-coordinating ranks may skip writing outputs in `finalize`.
pub trait Task {
    /// Human-readable name used in reports
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Check packet shape and values. Must not mutate anything.
    fn validate(&self, packet: &DataPacket) -> bool;

    /// Re-initialise working state from the packet inputs
    fn prepare(&mut self, packet: &DataPacket) -> bool;

    /// Compute using prepared working state only
    fn execute(&mut self) -> bool;

    /// Write results into the packet outputs
    fn finalize(&mut self, packet: &mut DataPacket) -> bool;
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn validate(&self, packet: &DataPacket) -> bool {
        (**self).validate(packet)
    }

    fn prepare(&mut self, packet: &DataPacket) -> bool {
        (**self).prepare(packet)
    }

    fn execute(&mut self) -> bool {
        (**self).execute()
    }

    fn finalize(&mut self, packet: &mut DataPacket) -> bool {
        (**self).finalize(packet)
    }
}

/// A task bound to a caller-owned packet, guarded by a phase-state marker
pub struct BoundTask<'p, T> {
    packet: &'p mut DataPacket,
    state: TaskState,
    task: T,
}

impl<'p, T: Task> BoundTask<'p, T> {
    /// Bind `task` to `packet`. The task starts [`TaskState::Idle`].
    pub fn new(task: T, packet: &'p mut DataPacket) -> Self {
        Self {
            packet,
            state: TaskState::Idle,
            task,
        }
    }

    /// Current phase state
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Whether a validation has succeeded and still holds
    pub fn is_validated(&self) -> bool {
        self.state != TaskState::Idle
    }

    /// Task name
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// The bound packet
    pub fn packet(&self) -> &DataPacket {
        &*self.packet
    }

    /// The wrapped task
    pub fn task(&self) -> &T {
        &self.task
    }

    /// Release the binding and return the task
    pub fn into_inner(self) -> T {
        self.task
    }

    /// Run the validate phase
    pub fn validate(&mut self) -> Result<bool> {
        self.guard(Phase::Validate)?;
        let ok = self.task.validate(self.packet);
        Ok(self.settle(Phase::Validate, ok))
    }

    /// Run the prepare phase
    pub fn prepare(&mut self) -> Result<bool> {
        self.guard(Phase::Prepare)?;
        let ok = self.task.prepare(self.packet);
        Ok(self.settle(Phase::Prepare, ok))
    }

    /// Run the execute phase
    pub fn execute(&mut self) -> Result<bool> {
        self.guard(Phase::Execute)?;
        let ok = self.task.execute();
        Ok(self.settle(Phase::Execute, ok))
    }

    /// Run the finalize phase
    pub fn finalize(&mut self) -> Result<bool> {
        self.guard(Phase::Finalize)?;
        let ok = self.task.finalize(self.packet);
        Ok(self.settle(Phase::Finalize, ok))
    }

    /// Run `phase` by value
    pub fn invoke(&mut self, phase: Phase) -> Result<bool> {
        match phase {
            Phase::Validate => self.validate(),
            Phase::Prepare => self.prepare(),
            Phase::Execute => self.execute(),
            Phase::Finalize => self.finalize(),
        }
    }

    /// One full cycle, validating first if needed.
    ///
    /// Stops at the first phase that returns `false`.
    pub fn run_cycle(&mut self) -> Result<bool> {
        let phases: &[Phase] = if self.is_validated() {
            &[Phase::Prepare, Phase::Execute, Phase::Finalize]
        } else {
            &[Phase::Validate, Phase::Prepare, Phase::Execute, Phase::Finalize]
        };
        for &phase in phases {
            if !self.invoke(phase)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn guard(&self, phase: Phase) -> Result<()> {
        match self.state.next(phase) {
            Some(_) => Ok(()),
            None => Err(Error::PhaseOrder {
                phase,
                state: self.state,
            }),
        }
    }

    fn settle(&mut self, phase: Phase, ok: bool) -> bool {
        self.state = if ok {
            self.state.next(phase).unwrap_or(self.state)
        } else {
            TaskState::on_failure(phase)
        };
        ok
    }
}

impl<T: Task> fmt::Debug for BoundTask<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundTask")
            .field("task", &self.task.name())
            .field("state", &self.state)
            .finish()
    }
}
