//! Adapters: concrete execution queues.

pub mod concurrent_queue;
mod job_runner;
pub mod serial_queue;

pub use concurrent_queue::ConcurrentQueue;
pub use serial_queue::SerialQueue;
