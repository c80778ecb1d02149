//! # Integration Tests
//!
//! Flows that combine dispatchers, completion groups and telemetry.

pub mod flows;
pub mod telemetry;
