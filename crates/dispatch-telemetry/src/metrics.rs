//! Prometheus metrics for dispatch queues and completion groups.
//!
//! All metrics follow the naming convention: `dispatch_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., jobs_submitted_total)
//! - **Histogram**: Distribution of values (e.g., job_duration_seconds)
//!
//! Vectors are labelled by queue `kind` (`serial` / `concurrent`).

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, IntCounter, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // QUEUE METRICS
    // =========================================================================

    /// Queues created, by kind
    pub static ref QUEUES_CREATED: CounterVec = CounterVec::new(
        Opts::new("dispatch_queues_created_total", "Total dispatch queues created"),
        &["kind"]
    ).expect("metric creation failed");

    /// Jobs accepted by a queue, by kind
    pub static ref JOBS_SUBMITTED: CounterVec = CounterVec::new(
        Opts::new("dispatch_jobs_submitted_total", "Total jobs submitted to dispatch queues"),
        &["kind"]
    ).expect("metric creation failed");

    /// Jobs that ran to completion, by kind
    pub static ref JOBS_COMPLETED: CounterVec = CounterVec::new(
        Opts::new("dispatch_jobs_completed_total", "Total jobs that finished without panicking"),
        &["kind"]
    ).expect("metric creation failed");

    /// Jobs that panicked, by kind
    pub static ref JOB_PANICS: CounterVec = CounterVec::new(
        Opts::new("dispatch_job_panics_total", "Total jobs that panicked"),
        &["kind"]
    ).expect("metric creation failed");

    /// Job run time
    pub static ref JOB_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dispatch_job_duration_seconds",
            "Time spent running a single dispatched job"
        ).buckets(exponential_buckets(0.00001, 4.0, 12).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // COMPLETION GROUP METRICS
    // =========================================================================

    /// Notifications handed to their dispatcher after a zero crossing
    pub static ref GROUP_NOTIFICATIONS_FIRED: IntCounter = IntCounter::new(
        "dispatch_group_notifications_fired_total",
        "Total completion group notifications submitted"
    ).expect("metric creation failed");
}

/// Handle returned once all metrics are registered.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    registered: usize,
}

impl MetricsHandle {
    /// Number of collectors registered by this call.
    pub fn registered(&self) -> usize {
        self.registered
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; collectors that are already registered are
/// skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(QUEUES_CREATED.clone()),
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOBS_COMPLETED.clone()),
        Box::new(JOB_PANICS.clone()),
        Box::new(JOB_DURATION.clone()),
        Box::new(GROUP_NOTIFICATIONS_FIRED.clone()),
    ];

    let mut registered = 0;
    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) => registered += 1,
            Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { registered })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
