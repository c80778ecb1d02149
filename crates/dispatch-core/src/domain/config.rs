//! Runtime configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use dispatch_core::{DispatchConfig, PanicPolicy};
//!
//! let config = DispatchConfig {
//!     worker_threads: 4,
//!     panic_policy: PanicPolicy::LogAndContinue,
//!     ..DispatchConfig::default()
//! };
//! dispatch_core::configure(config)?;
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use super::errors::DispatchError;

/// Longest thread name prefix accepted; thread names are truncated by most
/// platforms anyway.
pub const MAX_THREAD_PREFIX_LEN: usize = 32;

/// What happens when a dispatched job panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanicPolicy {
    /// Log the panic and abort the process
    #[default]
    Abort,
    /// Log the panic, count it, and keep the worker running
    LogAndContinue,
}

impl FromStr for PanicPolicy {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(PanicPolicy::Abort),
            "log" | "log_and_continue" | "continue" => Ok(PanicPolicy::LogAndContinue),
            other => Err(DispatchError::InvalidConfig(format!(
                "unknown panic policy: {}",
                other
            ))),
        }
    }
}

/// Dispatch runtime configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Threads in the shared worker pool used by concurrent queues
    pub worker_threads: usize,
    /// Prefix for every thread the runtime spawns
    pub thread_name_prefix: String,
    /// Behaviour when a job panics
    pub panic_policy: PanicPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get().max(1),
            thread_name_prefix: "dispatch".to_string(),
            panic_policy: PanicPolicy::Abort,
        }
    }
}

impl DispatchConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DISPATCH_WORKER_THREADS`: Pool size (default: logical CPU count)
    /// - `DISPATCH_THREAD_PREFIX`: Thread name prefix (default: dispatch)
    /// - `DISPATCH_PANIC_POLICY`: `abort` or `log` (default: abort)
    ///
    /// Values that are unparseable or would fail [`validate`](Self::validate)
    /// fall back to the default for that field only.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, with the same per-field
    /// fallback as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            worker_threads: lookup("DISPATCH_WORKER_THREADS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.worker_threads),

            thread_name_prefix: lookup("DISPATCH_THREAD_PREFIX")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && v.len() <= MAX_THREAD_PREFIX_LEN)
                .unwrap_or(defaults.thread_name_prefix),

            panic_policy: lookup("DISPATCH_PANIC_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.panic_policy),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.worker_threads == 0 {
            return Err(DispatchError::InvalidConfig(
                "worker_threads must be at least 1".to_string(),
            ));
        }

        let prefix = self.thread_name_prefix.trim();
        if prefix.is_empty() {
            return Err(DispatchError::InvalidConfig(
                "thread_name_prefix must not be empty".to_string(),
            ));
        }
        if prefix.len() > MAX_THREAD_PREFIX_LEN {
            return Err(DispatchError::InvalidConfig(format!(
                "thread_name_prefix longer than {} bytes",
                MAX_THREAD_PREFIX_LEN
            )));
        }

        Ok(())
    }

    /// Name for a thread of this runtime, e.g. `dispatch-main`.
    pub fn thread_name(&self, suffix: &str) -> String {
        format!("{}-{}", self.thread_name_prefix.trim(), suffix)
    }
}
