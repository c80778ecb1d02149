//! Ports layer: traits at the crate boundary.

pub mod outbound;

pub use outbound::{ExecutionQueue, Job, QueueHandle};
