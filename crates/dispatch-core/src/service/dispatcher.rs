//! # Dispatcher
//!
//! A named execution context with a non-blocking submit. Each dispatcher
//! wraps one [`QueueHandle`]; cloning a dispatcher aliases that queue.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::{error, trace};

use super::completion_group::CompletionGroup;
use crate::adapters::{ConcurrentQueue, SerialQueue};
use crate::domain::{DispatchError, QueueId, QueueKind, QueueLabel};
use crate::ports::{Job, QueueHandle};
use crate::runtime;

/// Label of the process-wide main queue.
pub const MAIN_QUEUE_LABEL: &str = "main";

lazy_static! {
    static ref MAIN: Dispatcher = Dispatcher::start_main();
}

/// Facade over one execution queue.
#[derive(Clone)]
pub struct Dispatcher {
    queue: QueueHandle,
}

impl Dispatcher {
    /// The process-wide main dispatcher.
    ///
    /// Backed by a serial queue served by a single dedicated thread named
    /// `<prefix>-main`. Created on first call; every call returns the same
    /// instance.
    pub fn main() -> &'static Dispatcher {
        &MAIN
    }

    fn start_main() -> Self {
        let config = runtime::config();
        let spawned = SerialQueue::spawn_named(
            QueueLabel::new(MAIN_QUEUE_LABEL),
            config.thread_name("main"),
            config.panic_policy,
        );
        match spawned {
            Ok(queue) => Self::with_queue(Arc::new(queue)),
            Err(e) => {
                error!(error = %e, "Main dispatch thread failed to start");
                panic!("main dispatch thread failed to start: {}", e);
            }
        }
    }

    /// New dispatcher on a fresh concurrent queue.
    pub fn create(label: impl Into<QueueLabel>) -> Self {
        Self::with_queue(Arc::new(ConcurrentQueue::new(label.into())))
    }

    /// New dispatcher on a fresh serial queue with its own worker thread.
    pub fn create_serial(label: impl Into<QueueLabel>) -> Result<Self, DispatchError> {
        let queue = SerialQueue::spawn(label.into(), runtime::config())?;
        Ok(Self::with_queue(Arc::new(queue)))
    }

    /// Wrap an existing queue. The result aliases `queue`.
    pub fn with_queue(queue: QueueHandle) -> Self {
        Self { queue }
    }

    /// Run `work` asynchronously on this dispatcher's queue.
    ///
    /// Never blocks and never runs `work` on the calling thread.
    pub fn submit<F>(&self, work: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_job(Box::new(work))
    }

    /// Submit an already boxed job.
    pub fn submit_job(&self, job: Job) -> Result<(), DispatchError> {
        trace!(queue = %self.label(), kind = %self.kind(), "Submitting job");
        self.queue.enqueue(job)
    }

    /// Run `work` as a tracked member of `group`.
    ///
    /// The group is entered before submission and left once `work` returns,
    /// or immediately if the submission fails.
    pub fn submit_in_group<F>(&self, group: &CompletionGroup, work: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let token = group.enter_scoped();
        self.submit(move || {
            let _token = token;
            work();
        })
    }

    /// Underlying queue handle, for interop.
    pub fn queue(&self) -> QueueHandle {
        Arc::clone(&self.queue)
    }

    /// Diagnostic label.
    pub fn label(&self) -> &QueueLabel {
        self.queue.label()
    }

    /// Ordering class of the underlying queue.
    pub fn kind(&self) -> QueueKind {
        self.queue.kind()
    }

    /// Identifier of the underlying queue.
    pub fn id(&self) -> QueueId {
        self.queue.id()
    }

    /// Whether both dispatchers submit to the same queue.
    pub fn same_queue(&self, other: &Dispatcher) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("queue", &self.queue)
            .finish()
    }
}
