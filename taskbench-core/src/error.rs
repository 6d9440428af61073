//! Error types for taskbench-core

use crate::group::TransportError;
use crate::task::{Phase, TaskState};
use thiserror::Error;

/// Result type alias using taskbench-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the task lifecycle and the performance harness
#[derive(Debug, Error)]
pub enum Error {
    /// A phase was invoked out of order
    #[error("contract violation: {phase} called while task is {state}")]
    PhaseOrder {
        /// Phase that was requested
        phase: Phase,
        /// State the task was in
        state: TaskState,
    },

    /// A performance run was requested before a successful Validate
    #[error("contract violation: task `{task}` has not been validated")]
    NotValidated {
        /// Task name
        task: String,
    },

    /// A phase reported failure during a measured run
    #[error("task fault: {phase} failed on iteration {iteration}")]
    TaskFault {
        /// Phase that returned `false`
        phase: Phase,
        /// Zero-based index over every iteration of the run, warmup included
        iteration: u64,
    },

    /// Harness configuration rejected
    #[error("invalid harness configuration: {0}")]
    InvalidConfig(String),

    /// Process group failure
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    /// Whether this error indicates a caller or harness bug
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::PhaseOrder { .. } | Error::NotValidated { .. })
    }
}
