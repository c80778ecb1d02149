//! # Domain Module
//!
//! Core types for dispatch queues and completion groups. No threads, no I/O.

pub mod config;
pub mod errors;
pub mod group_state;
pub mod value_objects;

pub use config::*;
pub use errors::*;
pub use group_state::*;
pub use value_objects::*;
