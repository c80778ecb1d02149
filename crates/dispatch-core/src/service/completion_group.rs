//! # Completion Group
//!
//! Tracks a set of in-flight work items and fires registered callbacks on a
//! chosen [`Dispatcher`] when the outstanding count returns to zero.
//!
//! Clones share one counter, so `enter` and `leave` can be called from any
//! thread that holds a clone.

use std::fmt;
use std::sync::Arc;

use dispatch_telemetry::GROUP_NOTIFICATIONS_FIRED;
use parking_lot::Mutex;
use tracing::{debug, error, trace};

use super::dispatcher::Dispatcher;
use crate::domain::{DispatchError, GroupError, GroupState, LeaveOutcome, Registration};
use crate::ports::Job;

/// A callback waiting for the next zero crossing.
struct PendingNotification {
    dispatcher: Dispatcher,
    callback: Job,
}

impl PendingNotification {
    fn submit(self) -> Result<(), DispatchError> {
        self.dispatcher.submit_job(self.callback)?;
        GROUP_NOTIFICATIONS_FIRED.inc();
        Ok(())
    }

    fn fire(self) {
        let label = self.dispatcher.label().clone();
        if let Err(e) = self.submit() {
            error!(queue = %label, error = %e, "Dropping undeliverable group notification");
        }
    }
}

/// Counter-based join primitive.
#[derive(Clone, Default)]
pub struct CompletionGroup {
    state: Arc<Mutex<GroupState<PendingNotification>>>,
}

impl CompletionGroup {
    /// New group with nothing outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of one tracked work item.
    pub fn enter(&self) {
        let outstanding = self.state.lock().enter();
        trace!(outstanding, "Group entered");
    }

    /// Record the end of one tracked work item.
    ///
    /// # Panics
    ///
    /// If there is no outstanding `enter` to match. Use
    /// [`try_leave`](Self::try_leave) to get an error instead.
    #[track_caller]
    pub fn leave(&self) {
        if let Err(e) = self.try_leave() {
            panic!("CompletionGroup contract violation: {}", e);
        }
    }

    /// Record the end of one tracked work item, reporting underflow as an
    /// error. The group is unchanged on error.
    pub fn try_leave(&self) -> Result<(), GroupError> {
        // Lock is released before any notification is submitted
        let outcome = self.state.lock().leave()?;

        match outcome {
            LeaveOutcome::StillActive { outstanding } => {
                trace!(outstanding, "Group left");
            }
            LeaveOutcome::Quiesced(notifications) => {
                debug!(notifications = notifications.len(), "Group quiesced");
                for notification in notifications {
                    notification.fire();
                }
            }
        }
        Ok(())
    }

    /// Run `callback` on `dispatcher` at the next zero crossing.
    ///
    /// If nothing is outstanding the callback is submitted right away, still
    /// asynchronously. The only error is a closed target queue in that
    /// immediate case.
    pub fn notify<F>(&self, dispatcher: &Dispatcher, callback: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        let pending = PendingNotification {
            dispatcher: dispatcher.clone(),
            callback: Box::new(callback),
        };

        let registration = self.state.lock().register(pending);
        match registration {
            Registration::Deferred => {
                trace!(queue = %dispatcher.label(), "Group notification deferred");
                Ok(())
            }
            Registration::Immediate(pending) => pending.submit(),
        }
    }

    /// Enter the group and return a token that leaves it when dropped.
    pub fn enter_scoped(&self) -> GroupToken {
        self.enter();
        GroupToken {
            group: self.clone(),
        }
    }

    /// Current outstanding count.
    pub fn outstanding(&self) -> usize {
        self.state.lock().outstanding()
    }

    /// Whether nothing is outstanding.
    pub fn is_quiescent(&self) -> bool {
        self.outstanding() == 0
    }

    /// Notifications waiting for the next zero crossing.
    pub fn pending_notifications(&self) -> usize {
        self.state.lock().pending()
    }
}

impl fmt::Debug for CompletionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CompletionGroup")
            .field("outstanding", &state.outstanding())
            .field("pending_notifications", &state.pending())
            .finish()
    }
}

/// Membership in a [`CompletionGroup`]; leaves the group on drop.
#[must_use = "dropping the token leaves the group immediately"]
pub struct GroupToken {
    group: CompletionGroup,
}

impl Drop for GroupToken {
    fn drop(&mut self) {
        if let Err(e) = self.group.try_leave() {
            // Someone called leave() by hand for this token's enter
            error!(error = %e, "Group token released after an unmatched leave");
        }
    }
}
