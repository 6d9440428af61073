//! Process Group Transport
//!
//! Abstract message-passing capability for tasks whose logical instance is
//! replicated across cooperating processes. Real transports live outside this
//! crate; [`SoloGroup`] covers the single-process case.

use std::cell::RefCell;
use std::collections::VecDeque;
use thiserror::Error;

/// Rank that holds authoritative output and drives lockstep decisions
pub const COORDINATOR_RANK: usize = 0;

/// Errors raised by a process group
#[derive(Debug, Error)]
pub enum TransportError {
    /// A rank outside `0..size` was addressed
    #[error("rank {rank} out of range for group of size {size}")]
    InvalidRank {
        /// Addressed rank
        rank: usize,
        /// Group size
        size: usize,
    },

    /// Nothing queued for the requested source and tag
    #[error("no pending message from rank {source_rank} with tag {tag}")]
    NoMessage {
        /// Sending rank
        source_rank: usize,
        /// Message tag
        tag: u32,
    },

    /// A payload did not have the expected shape
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The underlying transport failed
    #[error("transport failure: {0}")]
    Failed(String),
}

/// Collective and point-to-point operations over a group of processes
pub trait ProcessGroup {
    /// Rank of this process, in `0..size()`
    fn rank(&self) -> usize;

    /// Number of processes in the group
    fn size(&self) -> usize;

    /// Whether this process is the coordinating instance
    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR_RANK
    }

    /// Send `data` to `dest`
    fn send(&self, dest: usize, tag: u32, data: &[u8]) -> Result<(), TransportError>;

    /// Receive the next message from `source` carrying `tag`
    fn recv(&self, source: usize, tag: u32) -> Result<Vec<u8>, TransportError>;

    /// Replace `data` on every rank with the root's copy
    fn broadcast(&self, root: usize, data: &mut Vec<u8>) -> Result<(), TransportError>;

    /// Sum `value` across ranks; `Some(total)` on the root, `None` elsewhere
    fn reduce_sum_f64(&self, root: usize, value: f64) -> Result<Option<f64>, TransportError>;

    /// Block until every rank has arrived
    fn barrier(&self) -> Result<(), TransportError>;
}

/// Agree on the coordinator's boolean decision across the group
pub fn broadcast_flag(group: &dyn ProcessGroup, flag: bool) -> Result<bool, TransportError> {
    let mut payload = vec![u8::from(flag)];
    group.broadcast(COORDINATOR_RANK, &mut payload)?;
    match payload.as_slice() {
        [byte] => Ok(*byte != 0),
        other => Err(TransportError::Malformed(format!(
            "expected 1-byte flag, got {} bytes",
            other.len()
        ))),
    }
}

/// Group of one process. Sends to self are queued and received in order.
#[derive(Debug, Default)]
pub struct SoloGroup {
    mailbox: RefCell<VecDeque<(u32, Vec<u8>)>>,
}

impl SoloGroup {
    /// Create a single-process group
    pub fn new() -> Self {
        Self::default()
    }

    fn check_rank(&self, rank: usize) -> Result<(), TransportError> {
        if rank == COORDINATOR_RANK {
            Ok(())
        } else {
            Err(TransportError::InvalidRank { rank, size: 1 })
        }
    }
}

impl ProcessGroup for SoloGroup {
    fn rank(&self) -> usize {
        COORDINATOR_RANK
    }

    fn size(&self) -> usize {
        1
    }

    fn send(&self, dest: usize, tag: u32, data: &[u8]) -> Result<(), TransportError> {
        self.check_rank(dest)?;
        self.mailbox.borrow_mut().push_back((tag, data.to_vec()));
        Ok(())
    }

    fn recv(&self, source: usize, tag: u32) -> Result<Vec<u8>, TransportError> {
        self.check_rank(source)?;
        let mut mailbox = self.mailbox.borrow_mut();
        let position = mailbox.iter().position(|(t, _)| *t == tag).ok_or(
            TransportError::NoMessage {
                source_rank: source,
                tag,
            },
        )?;
        Ok(mailbox.remove(position).map(|(_, data)| data).unwrap_or_default())
    }

    fn broadcast(&self, root: usize, _data: &mut Vec<u8>) -> Result<(), TransportError> {
        self.check_rank(root)
    }

    fn reduce_sum_f64(&self, root: usize, value: f64) -> Result<Option<f64>, TransportError> {
        self.check_rank(root)?;
        Ok(Some(value))
    }

    fn barrier(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
