//! Outbound Ports (Driven Ports)
//!
//! The execution queue a `Dispatcher` submits to. The crate ships a serial
//! and a concurrent implementation in `adapters/`; hosts that already own an
//! event loop can implement this trait and wrap it with
//! `Dispatcher::with_queue`.

use std::fmt;
use std::sync::Arc;

use crate::domain::{DispatchError, QueueId, QueueKind, QueueLabel};

/// A deferred, zero-argument unit of work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to an execution queue.
pub type QueueHandle = Arc<dyn ExecutionQueue>;

/// An execution context that accepts jobs.
pub trait ExecutionQueue: Send + Sync {
    /// Process-unique identifier.
    fn id(&self) -> QueueId;

    /// Diagnostic label.
    fn label(&self) -> &QueueLabel;

    /// Ordering class this queue guarantees.
    fn kind(&self) -> QueueKind;

    /// Accept a job for later execution.
    ///
    /// Must not block and must never run `job` on the calling thread.
    fn enqueue(&self, job: Job) -> Result<(), DispatchError>;
}

impl fmt::Debug for dyn ExecutionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionQueue")
            .field("id", &self.id())
            .field("label", &self.label().as_str())
            .field("kind", &self.kind())
            .finish()
    }
}
