//! # Completion Group State Machine
//!
//! Pure counter-and-waiters logic behind `CompletionGroup`, with no locking
//! and no dispatching. The service layer wraps it in a mutex and submits the
//! notifications this type hands back.
//!
//! ```text
//!            enter                     enter / leave (n > 1)
//!   ┌────────────────────┐           ┌──────────┐
//!   │                    ▼           │          ▼
//! QUIESCENT (n == 0)   ACTIVE (n > 0) ───────────┘
//!   ▲                    │
//!   └────────────────────┘
//!        leave (n == 1): drain pending notifications
//! ```

use super::errors::GroupError;

/// Logical state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPhase {
    /// No outstanding work
    Quiescent,
    /// At least one `enter` without a matching `leave`
    Active,
}

/// Result of a successful `leave`.
#[derive(Debug, PartialEq, Eq)]
pub enum LeaveOutcome<N> {
    /// Counter still above zero
    StillActive {
        /// Outstanding count after the leave
        outstanding: usize,
    },
    /// Counter crossed from 1 to 0; these notifications must now fire
    Quiesced(Vec<N>),
}

/// Result of registering a notification.
#[derive(Debug, PartialEq, Eq)]
pub enum Registration<N> {
    /// Stored until the next zero crossing
    Deferred,
    /// Group is already quiescent; the caller must dispatch it now
    Immediate(N),
}

/// Outstanding counter plus notifications waiting for the next zero crossing.
#[derive(Debug)]
pub struct GroupState<N> {
    outstanding: usize,
    pending: Vec<N>,
}

impl<N> Default for GroupState<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> GroupState<N> {
    /// Quiescent state with no registrations.
    pub fn new() -> Self {
        Self {
            outstanding: 0,
            pending: Vec::new(),
        }
    }

    /// Current outstanding count.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Notifications waiting for the next zero crossing.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Current phase.
    pub fn phase(&self) -> GroupPhase {
        if self.outstanding == 0 {
            GroupPhase::Quiescent
        } else {
            GroupPhase::Active
        }
    }

    /// Record the start of one tracked work item.
    pub fn enter(&mut self) -> usize {
        // usize::MAX outstanding items is not reachable in practice
        self.outstanding = self.outstanding.saturating_add(1);
        self.outstanding
    }

    /// Record the end of one tracked work item.
    ///
    /// Fails without changing state when nothing is outstanding.
    pub fn leave(&mut self) -> Result<LeaveOutcome<N>, GroupError> {
        match self.outstanding {
            0 => Err(GroupError::Underflow),
            1 => {
                self.outstanding = 0;
                Ok(LeaveOutcome::Quiesced(std::mem::take(&mut self.pending)))
            }
            n => {
                self.outstanding = n - 1;
                Ok(LeaveOutcome::StillActive {
                    outstanding: self.outstanding,
                })
            }
        }
    }

    /// Register a notification for the next zero crossing.
    pub fn register(&mut self, notification: N) -> Registration<N> {
        if self.outstanding == 0 {
            Registration::Immediate(notification)
        } else {
            self.pending.push(notification);
            Registration::Deferred
        }
    }
}
