//! # Dispatch Kit Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Cross-crate flows (core + telemetry)
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p dispatch-tests
//!
//! # Benchmarks
//! cargo bench -p dispatch-tests
//! ```

#![allow(dead_code)]

pub mod integration;
