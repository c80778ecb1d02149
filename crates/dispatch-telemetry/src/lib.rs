//! # Dispatch Telemetry
//!
//! Logging and metrics for Dispatch Kit.
//!
//! ## Components
//!
//! - **Logging**: global `tracing` subscriber with an `EnvFilter` and a pretty
//!   or JSON formatter
//! - **Metrics**: Prometheus counters and histograms updated by
//!   `dispatch-core` as queues run jobs and groups fire notifications
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dispatch_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! // Queues and groups now log and record metrics
//! let text = dispatch_telemetry::encode_metrics()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DISPATCH_SERVICE_NAME` | `dispatch-kit` | Service name in the startup log |
//! | `DISPATCH_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `DISPATCH_JSON_LOGS` | `false` | JSON formatted logs |
//! | `DISPATCH_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, LoggingHandle};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, GROUP_NOTIFICATIONS_FIRED,
    JOBS_COMPLETED, JOBS_SUBMITTED, JOB_DURATION, JOB_PANICS, QUEUES_CREATED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be built or installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// A collector could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    config.validate()?;

    // Metrics first so the startup log can report them
    let metrics = register_metrics()?;
    let logging = init_logging(&config)?;

    tracing::debug!(collectors = metrics.registered(), "Metrics registered");

    Ok(TelemetryGuard {
        service_name: config.service_name,
        _logging: logging,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
    _logging: LoggingHandle,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
