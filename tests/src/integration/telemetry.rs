//! # Telemetry Integration Tests
//!
//! Checks that queue activity in `dispatch-core` shows up in the metrics
//! exported by `dispatch-telemetry`.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dispatch_core::{CompletionGroup, Dispatcher};
    use dispatch_telemetry::{
        encode_metrics, init_telemetry, register_metrics, TelemetryConfig, JOBS_SUBMITTED,
        QUEUES_CREATED,
    };
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    // =============================================================================
    // METRICS
    // =============================================================================

    #[tokio::test]
    async fn test_submissions_are_counted_and_exported() {
        register_metrics().expect("register");

        let serial_before = JOBS_SUBMITTED.with_label_values(&["serial"]).get();
        let created_before = QUEUES_CREATED.with_label_values(&["serial"]).get();

        let queue = Dispatcher::create_serial("metrics-flow").expect("serial queue");
        let group = CompletionGroup::new();
        for _ in 0..4 {
            queue.submit_in_group(&group, || {}).expect("submit");
        }
        let (tx, mut rx) = mpsc::unbounded_channel();
        group
            .notify(&queue, move || {
                let _ = tx.send(());
            })
            .expect("notify");
        timeout(WAIT, rx.recv()).await.expect("group finished");

        // Counters are process-wide; other tests may add to them concurrently
        assert!(JOBS_SUBMITTED.with_label_values(&["serial"]).get() >= serial_before + 5.0);
        assert!(QUEUES_CREATED.with_label_values(&["serial"]).get() >= created_before + 1.0);

        let text = encode_metrics().expect("encode");
        assert!(text.contains("dispatch_jobs_submitted_total"));
        assert!(text.contains("dispatch_queues_created_total"));
        assert!(text.contains("dispatch_group_notifications_fired_total"));
    }

    // =============================================================================
    // FULL INITIALIZATION
    // =============================================================================

    /// The only test in this binary that installs the global subscriber.
    #[tokio::test]
    async fn test_init_telemetry_then_dispatch() {
        let config = TelemetryConfig {
            service_name: "dispatch-tests".to_string(),
            log_level: "dispatch_core=debug,warn".to_string(),
            json_logs: true,
            console_output: false,
        };
        let guard = init_telemetry(config).expect("telemetry init");

        let (tx, mut rx) = mpsc::unbounded_channel();
        Dispatcher::create("traced")
            .submit(move || {
                let _ = tx.send(());
            })
            .expect("submit");
        timeout(WAIT, rx.recv()).await.expect("job ran");

        drop(guard);
    }
}
