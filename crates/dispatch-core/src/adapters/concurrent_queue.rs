//! Concurrent Queue Adapter
//!
//! Owns no threads: every job is spawned onto a Rayon pool, by default the
//! runtime's shared worker pool. Jobs may run in any order and in parallel.

use std::sync::Arc;

use dispatch_telemetry::{JOBS_SUBMITTED, QUEUES_CREATED};
use rayon::ThreadPool;
use tracing::debug;

use super::job_runner::run_job;
use crate::domain::{DispatchError, PanicPolicy, QueueId, QueueKind, QueueLabel};
use crate::ports::{ExecutionQueue, Job};
use crate::runtime;

/// Unordered queue that spawns onto a worker pool.
pub struct ConcurrentQueue {
    id: QueueId,
    label: QueueLabel,
    pool: Arc<ThreadPool>,
    policy: PanicPolicy,
}

impl ConcurrentQueue {
    /// Queue on the runtime's shared worker pool.
    pub fn new(label: QueueLabel) -> Self {
        let policy = runtime::config().panic_policy;
        Self::on_pool(label, runtime::shared_pool(), policy)
    }

    /// Queue on a caller-supplied pool.
    pub fn on_pool(label: QueueLabel, pool: Arc<ThreadPool>, policy: PanicPolicy) -> Self {
        let id = QueueId::next();

        QUEUES_CREATED
            .with_label_values(&[QueueKind::Concurrent.as_str()])
            .inc();
        debug!(
            queue = %label,
            queue_id = %id,
            workers = pool.current_num_threads(),
            "Concurrent queue created"
        );

        Self {
            id,
            label,
            pool,
            policy,
        }
    }

    /// Threads available to this queue.
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ExecutionQueue for ConcurrentQueue {
    fn id(&self) -> QueueId {
        self.id
    }

    fn label(&self) -> &QueueLabel {
        &self.label
    }

    fn kind(&self) -> QueueKind {
        QueueKind::Concurrent
    }

    fn enqueue(&self, job: Job) -> Result<(), DispatchError> {
        let label = self.label.clone();
        let policy = self.policy;

        self.pool
            .spawn(move || run_job(job, &label, QueueKind::Concurrent, policy));

        JOBS_SUBMITTED
            .with_label_values(&[QueueKind::Concurrent.as_str()])
            .inc();
        Ok(())
    }
}
