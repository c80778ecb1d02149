//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

use crate::TelemetryError;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// Log filter: a bare level or a full `EnvFilter` directive string
    pub log_level: String,

    /// Emit JSON formatted logs instead of the pretty format
    pub json_logs: bool,

    /// Write logs to stdout at all
    pub console_output: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "dispatch-kit".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            console_output: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DISPATCH_SERVICE_NAME`: Service name (default: dispatch-kit)
    /// - `DISPATCH_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `DISPATCH_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `DISPATCH_CONSOLE_OUTPUT`: Enable console output (default: true)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("DISPATCH_SERVICE_NAME")
                .unwrap_or_else(|_| "dispatch-kit".to_string()),

            log_level: env::var("DISPATCH_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("DISPATCH_JSON_LOGS")
                .map(|v| parse_flag(&v, false))
                .unwrap_or(false),

            console_output: env::var("DISPATCH_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, true))
                .unwrap_or(true),
        }
    }

    /// Reject configurations that cannot produce a usable subscriber.
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.service_name.trim().is_empty() {
            return Err(TelemetryError::Config(
                "service_name must not be empty".to_string(),
            ));
        }

        let level = self.log_level.trim();
        if level.is_empty() {
            return Err(TelemetryError::Config(
                "log_level must not be empty".to_string(),
            ));
        }

        // Level names, targets and directive syntax are checked by EnvFilter in build_filter

        Ok(())
    }
}

/// Interpret a boolean-ish environment value, falling back to `default`.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
