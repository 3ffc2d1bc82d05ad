//! # Task System Core Trait
//!
//! This module defines the unit of work handed to a build worker.
//!
//! ## Task Lifecycle
//! 1. The coordinator creates one `Task` per worker, each owning a disjoint
//!    slice of the data it works on
//! 2. Every task's `process()` runs on its own scoped worker thread
//! 3. The coordinator joins all workers and collects their outputs in worker
//!    order
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be moved onto its worker thread
//! - The output must be `Send` to be moved back to the coordinating thread
//! - A task may borrow data from the coordinator's stack; scoped threads keep
//!   the borrow alive until the join barrier

use crate::error::EngineError;

/// A unit of work executed on a build worker.
///
/// Tasks consume themselves: whatever they borrow mutably is released when
/// `process()` returns.
pub trait Task: Send {
    /// What the task hands back to the coordinator.
    type Output: Send;

    /// Runs the task to completion on the current thread.
    ///
    /// # Errors
    /// Returns an [`EngineError`] when a shared resource used by the task
    /// refuses its work; the coordinator stops the build with that error.
    fn process(self) -> Result<Self::Output, EngineError>;
}
