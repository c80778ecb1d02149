//! # Integration Test Flows
//!
//! End-to-end use of `Dispatcher` and `CompletionGroup` the way application
//! code drives them:
//!
//! 1. **Fan-out / fan-in**: concurrent work joined back onto the main queue
//! 2. **Staged pipeline**: one group's notification starts the next stage
//! 3. **Cross-thread leaves**: enter/leave split across threads
//! 4. **Host-provided queue**: a custom `ExecutionQueue` behind `with_queue`

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use dispatch_core::{
        CompletionGroup, DispatchError, Dispatcher, ExecutionQueue, Job, QueueHandle, QueueId,
        QueueKind, QueueLabel,
    };
    use parking_lot::Mutex;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};

    const WAIT: Duration = Duration::from_secs(5);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Host queue that counts submissions and forwards them to a serial queue.
    struct CountingQueue {
        id: QueueId,
        label: QueueLabel,
        inner: QueueHandle,
        enqueued: AtomicUsize,
    }

    impl CountingQueue {
        fn new(label: &str) -> Self {
            let inner = Dispatcher::create_serial(format!("{}-inner", label))
                .expect("serial queue")
                .queue();
            Self {
                id: QueueId::next(),
                label: QueueLabel::from(label),
                inner,
                enqueued: AtomicUsize::new(0),
            }
        }
    }

    impl ExecutionQueue for CountingQueue {
        fn id(&self) -> QueueId {
            self.id
        }

        fn label(&self) -> &QueueLabel {
            &self.label
        }

        fn kind(&self) -> QueueKind {
            QueueKind::Serial
        }

        fn enqueue(&self, job: Job) -> Result<(), DispatchError> {
            self.enqueued.fetch_add(1, Ordering::SeqCst);
            self.inner.enqueue(job)
        }
    }

    // =============================================================================
    // FAN-OUT / FAN-IN
    // =============================================================================

    /// Squares computed on a concurrent queue are summed once on main.
    #[tokio::test]
    async fn test_fan_out_then_join_on_main() {
        let workers = Dispatcher::create("squares");
        let group = CompletionGroup::new();
        let results = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for n in 1..=100u64 {
            let results = results.clone();
            workers
                .submit_in_group(&group, move || results.lock().push(n * n))
                .expect("submit");
        }

        let collected = results.clone();
        group
            .notify(Dispatcher::main(), move || {
                let sum: u64 = collected.lock().iter().sum();
                let _ = tx.send((sum, thread::current().name().map(str::to_string)));
            })
            .expect("notify");

        let (sum, thread_name) = timeout(WAIT, rx.recv())
            .await
            .expect("join fired")
            .expect("sender alive");

        assert_eq!(sum, (1..=100u64).map(|n| n * n).sum::<u64>());
        assert_eq!(results.lock().len(), 100);
        assert!(thread_name.unwrap_or_default().ends_with("-main"));
    }

    // =============================================================================
    // STAGED PIPELINE
    // =============================================================================

    /// Stage one runs serially, its notification kicks off a concurrent stage
    /// two, and a final notification reports on main.
    #[tokio::test]
    async fn test_staged_pipeline_with_chained_groups() {
        let parser = Dispatcher::create_serial("parse").expect("serial queue");
        let workers = Dispatcher::create("transform");
        let parsed = Arc::new(Mutex::new(Vec::new()));
        let transformed = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let stage_one = CompletionGroup::new();
        let stage_two = CompletionGroup::new();

        for line in ["3", "1", "4", "1", "5"] {
            let parsed = parsed.clone();
            parser
                .submit_in_group(&stage_one, move || {
                    parsed.lock().push(line.parse::<usize>().unwrap_or(0));
                })
                .expect("submit parse");
        }

        // Hold stage two open until stage one has fanned out
        let stage_two_token = stage_two.enter_scoped();
        let fan_out_parsed = parsed.clone();
        let fan_out_workers = workers.clone();
        let fan_out_group = stage_two.clone();
        let fan_out_total = transformed.clone();
        stage_one
            .notify(&parser, move || {
                let _token = stage_two_token;
                for value in fan_out_parsed.lock().iter().copied() {
                    let total = fan_out_total.clone();
                    let _ = fan_out_workers.submit_in_group(&fan_out_group, move || {
                        total.fetch_add(value * 10, Ordering::SeqCst);
                    });
                }
            })
            .expect("notify stage one");

        let report_total = transformed.clone();
        stage_two
            .notify(Dispatcher::main(), move || {
                let _ = tx.send(report_total.load(Ordering::SeqCst));
            })
            .expect("notify stage two");

        let total = timeout(WAIT, rx.recv()).await.expect("pipeline finished");
        assert_eq!(total, Some(140));
        assert_eq!(*parsed.lock(), vec![3, 1, 4, 1, 5]);
    }

    // =============================================================================
    // CROSS-THREAD LEAVES
    // =============================================================================

    /// enter x3, notify(main), leave x3 from three different threads: the
    /// callback runs once and sees all three leaves.
    #[tokio::test]
    async fn test_leaves_from_other_threads_fire_once() {
        let group = CompletionGroup::new();
        let leaves = Arc::new(AtomicUsize::new(0));
        let fired = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for _ in 0..3 {
            group.enter();
        }

        let seen = leaves.clone();
        let fire_count = fired.clone();
        group
            .notify(Dispatcher::main(), move || {
                fire_count.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(seen.load(Ordering::SeqCst));
            })
            .expect("notify");

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let group = group.clone();
                let leaves = leaves.clone();
                thread::spawn(move || {
                    leaves.fetch_add(1, Ordering::SeqCst);
                    group.leave();
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("leaver joined");
        }

        let observed = timeout(WAIT, rx.recv()).await.expect("callback ran");
        assert_eq!(observed, Some(3));

        sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    /// A group can be reused; earlier notifications do not fire again.
    #[tokio::test]
    async fn test_group_reuse_across_cycles() {
        let group = CompletionGroup::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for cycle in 0..3usize {
            group.enter();
            let fired = fired.clone();
            let tx = tx.clone();
            group
                .notify(Dispatcher::main(), move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                    let _ = tx.send(cycle);
                })
                .expect("notify");
            group.leave();

            let got = timeout(WAIT, rx.recv()).await.expect("cycle fired");
            assert_eq!(got, Some(cycle));
        }

        sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    // =============================================================================
    // HOST-PROVIDED QUEUE
    // =============================================================================

    /// Dispatchers and groups work unchanged over a custom queue.
    #[tokio::test]
    async fn test_custom_queue_behind_with_queue() {
        let host = Arc::new(CountingQueue::new("host-loop"));
        let dispatcher = Dispatcher::with_queue(host.clone());
        let group = CompletionGroup::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for i in 0..5 {
            let order = order.clone();
            dispatcher
                .submit_in_group(&group, move || order.lock().push(i))
                .expect("submit");
        }
        group
            .notify(&dispatcher, move || {
                let _ = tx.send(());
            })
            .expect("notify");

        timeout(WAIT, rx.recv()).await.expect("notification ran");
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
        // Five jobs plus the notification
        assert_eq!(host.enqueued.load(Ordering::SeqCst), 6);
        assert_eq!(dispatcher.label().as_str(), "host-loop");
        assert!(Dispatcher::with_queue(dispatcher.queue()).same_queue(&dispatcher));
    }
}
