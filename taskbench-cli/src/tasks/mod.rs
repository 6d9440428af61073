//! Reference Tasks
//!
//! Small tasks registered with the CLI so the pipeline can be exercised
//! end to end. Each one builds its own packet for a given problem size and
//! checks the outputs its Finalize writes.

mod sort;
mod trapezoid;
mod vector_sum;

pub use sort::SortTask;
pub use trapezoid::TrapezoidTask;
pub use vector_sum::VectorSum;
