//! # Dispatch Core
//!
//! Named dispatch queues with a counter-based completion group.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no threads
//!   - `GroupState`: outstanding counter and pending notifications
//!   - `DispatchConfig`: runtime configuration with validation
//!   - `QueueLabel`, `QueueKind`, `QueueId`: queue identity
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `ExecutionQueue`: Driven port, the queue a dispatcher submits to
//!
//! - **Adapters Layer** (`adapters/`): Concrete queues
//!   - `SerialQueue`: one dedicated thread, FIFO
//!   - `ConcurrentQueue`: spawns onto the shared Rayon pool
//!
//! - **Service Layer** (`service/`): Public facades
//!   - `Dispatcher`: submit work to a queue; `Dispatcher::main()` singleton
//!   - `CompletionGroup`: enter / leave / notify
//!
//! ## Ordering
//!
//! | Queue | Ordering |
//! |-------|----------|
//! | `Dispatcher::main()` | Serial, one `<prefix>-main` thread |
//! | `Dispatcher::create_serial` | Serial, one thread per queue |
//! | `Dispatcher::create` | Concurrent, none |
//!
//! Nothing is ordered across dispatchers.
//!
//! ## Invariants
//!
//! - The group counter never goes below zero; `leave` past zero panics.
//! - Every notification fires exactly once, after the `leave` that brought
//!   the counter to zero, and never inline on the registering thread.
//!
//! ## Usage Example
//!
//! ```ignore
//! use dispatch_core::{CompletionGroup, Dispatcher};
//!
//! let io = Dispatcher::create("io");
//! let group = CompletionGroup::new();
//!
//! for path in paths {
//!     io.submit_in_group(&group, move || load(path))?;
//! }
//! group.notify(Dispatcher::main(), || println!("all loaded"))?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod runtime;
pub mod service;

// Re-exports
pub use adapters::{ConcurrentQueue, SerialQueue};
pub use domain::{
    DispatchConfig, DispatchError, GroupError, GroupPhase, PanicPolicy, QueueId, QueueKind,
    QueueLabel,
};
pub use ports::{ExecutionQueue, Job, QueueHandle};
pub use runtime::configure;
pub use service::{CompletionGroup, Dispatcher, GroupToken, MAIN_QUEUE_LABEL};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
