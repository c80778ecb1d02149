//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber built from [`TelemetryConfig`]:
//! an `EnvFilter` plus either a pretty or a JSON `fmt` layer. Worker
//! thread names are included so logs from `<prefix>-main`,
//! `<prefix>-worker-N` and serial queue threads can be told apart.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Handle describing the installed subscriber.
#[derive(Debug, Clone)]
pub struct LoggingHandle {
    /// Filter the subscriber was built with
    pub filter: String,
    /// Whether JSON output is active
    pub json: bool,
}

/// Build the `EnvFilter` for a configuration without installing anything.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_level.trim())
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Install the global subscriber.
///
/// Fails with [`TelemetryError::LoggingInit`] if a global subscriber is
/// already set (for example by a test harness).
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingHandle, TelemetryError> {
    let env_filter = build_filter(config)?;

    let installed = if !config.console_output {
        tracing_subscriber::registry().with(env_filter).try_init()
    } else if config.json_logs {
        // JSON output for log shippers
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
    } else {
        // Pretty output for development
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    };

    installed.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        filter = %config.log_level,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(LoggingHandle {
        filter: config.log_level.clone(),
        json: config.json_logs,
    })
}
