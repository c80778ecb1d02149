//! Serial Queue Adapter
//!
//! One dedicated worker thread draining an unbounded channel, so jobs run
//! one at a time in submission order. The worker exits after draining once
//! the last handle to the queue is dropped.

use std::thread;

use dispatch_telemetry::{JOBS_SUBMITTED, QUEUES_CREATED};
use tokio::sync::mpsc;
use tracing::debug;

use super::job_runner::run_job;
use crate::domain::{DispatchConfig, DispatchError, PanicPolicy, QueueId, QueueKind, QueueLabel};
use crate::ports::{ExecutionQueue, Job};

/// FIFO queue backed by a single named thread.
pub struct SerialQueue {
    id: QueueId,
    label: QueueLabel,
    thread_name: String,
    sender: mpsc::UnboundedSender<Job>,
}

impl SerialQueue {
    /// Spawn a serial queue using the runtime's thread prefix and panic policy.
    pub fn spawn(label: QueueLabel, config: &DispatchConfig) -> Result<Self, DispatchError> {
        let id = QueueId::next();
        let thread_name = config.thread_name(&format!("serial-{}", id.as_u64()));
        Self::spawn_with(id, label, thread_name, config.panic_policy)
    }

    /// Spawn a serial queue whose worker thread has an explicit name.
    pub fn spawn_named(
        label: QueueLabel,
        thread_name: impl Into<String>,
        policy: PanicPolicy,
    ) -> Result<Self, DispatchError> {
        Self::spawn_with(QueueId::next(), label, thread_name.into(), policy)
    }

    fn spawn_with(
        id: QueueId,
        label: QueueLabel,
        thread_name: String,
        policy: PanicPolicy,
    ) -> Result<Self, DispatchError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let worker_label = label.clone();

        thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    run_job(job, &worker_label, QueueKind::Serial, policy);
                }
                debug!(queue = %worker_label, "Serial queue closed, worker exiting");
            })
            .map_err(|e| DispatchError::WorkerSpawn(e.to_string()))?;

        QUEUES_CREATED
            .with_label_values(&[QueueKind::Serial.as_str()])
            .inc();
        debug!(queue = %label, queue_id = %id, thread = %thread_name, "Serial queue created");

        Ok(Self {
            id,
            label,
            thread_name,
            sender,
        })
    }

    /// Name of the worker thread.
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

impl ExecutionQueue for SerialQueue {
    fn id(&self) -> QueueId {
        self.id
    }

    fn label(&self) -> &QueueLabel {
        &self.label
    }

    fn kind(&self) -> QueueKind {
        QueueKind::Serial
    }

    fn enqueue(&self, job: Job) -> Result<(), DispatchError> {
        self.sender
            .send(job)
            .map_err(|_| DispatchError::QueueClosed {
                label: self.label.to_string(),
            })?;
        JOBS_SUBMITTED
            .with_label_values(&[QueueKind::Serial.as_str()])
            .inc();
        Ok(())
    }
}
