//! # Domain Errors
//!
//! Error types for queues, the runtime and completion groups.

use thiserror::Error;

/// Errors from dispatching work or configuring the runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The queue's worker is gone and can no longer accept jobs.
    #[error("Queue closed: {label}")]
    QueueClosed {
        /// Label of the queue that rejected the job
        label: String,
    },

    /// `configure` was called after the runtime had already started.
    #[error("Dispatch runtime already started; configuration can no longer change")]
    RuntimeAlreadyStarted,

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A worker thread could not be spawned.
    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
}

/// Completion group contract violations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GroupError {
    /// `leave` called with no outstanding `enter`.
    #[error("CompletionGroup::leave called more times than enter")]
    Underflow,
}
