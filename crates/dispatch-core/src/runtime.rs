//! Process-wide dispatch runtime.
//!
//! Holds the effective [`DispatchConfig`] and the shared Rayon worker pool
//! used by concurrent queues. Both are created lazily on first use and live
//! for the rest of the process. [`configure`] must run before that first use
//! to have any effect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{error, info, warn};

use crate::domain::{DispatchConfig, DispatchError};

lazy_static! {
    /// Config installed by `configure`, consumed when the runtime starts.
    static ref PENDING_CONFIG: Mutex<Option<DispatchConfig>> = Mutex::new(None);

    static ref RUNTIME: Runtime = Runtime::start();
}

/// Set once the runtime has taken its config. Only written while
/// `PENDING_CONFIG` is locked.
static STARTED: AtomicBool = AtomicBool::new(false);

struct Runtime {
    config: DispatchConfig,
    pool: Arc<ThreadPool>,
}

impl Runtime {
    fn start() -> Self {
        let installed = {
            let mut slot = PENDING_CONFIG.lock();
            STARTED.store(true, Ordering::SeqCst);
            slot.take()
        };

        let mut config = installed.unwrap_or_else(DispatchConfig::from_env);
        if let Err(e) = config.validate() {
            warn!(error = %e, "Dispatch config from environment rejected, using defaults");
            config = DispatchConfig::default();
        }

        let pool = match build_pool(&config) {
            Ok(pool) => pool,
            Err(e) => {
                error!(
                    error = %e,
                    workers = config.worker_threads,
                    "Dispatch runtime failed to start"
                );
                panic!("dispatch runtime failed to start: {}", e);
            }
        };

        info!(
            workers = config.worker_threads,
            prefix = %config.thread_name_prefix,
            panic_policy = ?config.panic_policy,
            "Dispatch runtime started"
        );

        Self {
            config,
            pool: Arc::new(pool),
        }
    }
}

/// Build the shared worker pool, naming threads `<prefix>-worker-<n>`.
fn build_pool(config: &DispatchConfig) -> Result<ThreadPool, DispatchError> {
    let prefix = config.thread_name_prefix.trim().to_string();
    ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .thread_name(move |index| format!("{}-worker-{}", prefix, index))
        .build()
        .map_err(|e| DispatchError::WorkerSpawn(e.to_string()))
}

/// Install the runtime configuration.
///
/// Fails with [`DispatchError::RuntimeAlreadyStarted`] once any queue has
/// been created, and with [`DispatchError::InvalidConfig`] if `config` does
/// not validate.
pub fn configure(config: DispatchConfig) -> Result<(), DispatchError> {
    config.validate()?;

    let mut slot = PENDING_CONFIG.lock();
    if STARTED.load(Ordering::SeqCst) {
        return Err(DispatchError::RuntimeAlreadyStarted);
    }
    *slot = Some(config);
    Ok(())
}

/// Whether the runtime has started.
pub fn is_started() -> bool {
    STARTED.load(Ordering::SeqCst)
}

/// Effective configuration, starting the runtime if needed.
pub fn config() -> &'static DispatchConfig {
    &RUNTIME.config
}

/// The shared worker pool, starting the runtime if needed.
pub(crate) fn shared_pool() -> Arc<ThreadPool> {
    Arc::clone(&RUNTIME.pool)
}
