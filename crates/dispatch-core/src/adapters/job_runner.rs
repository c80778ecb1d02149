//! Runs a single job on a worker thread and applies the panic policy.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use dispatch_telemetry::{time_histogram, JOBS_COMPLETED, JOB_DURATION, JOB_PANICS};
use tracing::{error, trace};

use crate::domain::{PanicPolicy, QueueKind, QueueLabel};
use crate::ports::Job;

/// Run `job`, recording metrics. A panic is logged, then either aborts the
/// process or is swallowed, depending on `policy`.
pub(crate) fn run_job(job: Job, queue: &QueueLabel, kind: QueueKind, policy: PanicPolicy) {
    let _timer = time_histogram!(JOB_DURATION);
    trace!(queue = %queue, kind = %kind, "Running job");

    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(()) => {
            JOBS_COMPLETED.with_label_values(&[kind.as_str()]).inc();
        }
        Err(payload) => {
            JOB_PANICS.with_label_values(&[kind.as_str()]).inc();
            error!(
                queue = %queue,
                kind = %kind,
                panic = %panic_message(payload.as_ref()),
                policy = ?policy,
                "Dispatched job panicked"
            );

            if policy == PanicPolicy::Abort {
                std::process::abort();
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
