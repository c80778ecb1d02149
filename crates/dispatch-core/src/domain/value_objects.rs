//! # Value Objects
//!
//! Identity and diagnostics types attached to every queue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Rendering used for queues created without a label.
pub const ANONYMOUS_LABEL: &str = "<anonymous>";

/// Ordering class a queue provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    /// Single worker, jobs run in submission order
    Serial,
    /// Shared worker pool, no ordering between jobs
    Concurrent,
}

impl QueueKind {
    /// Stable lowercase name, used for metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueKind::Serial => "serial",
            QueueKind::Concurrent => "concurrent",
        }
    }

    /// Whether jobs on this queue run in submission order.
    pub fn preserves_order(&self) -> bool {
        matches!(self, QueueKind::Serial)
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional human-readable queue label.
///
/// Used for thread names and log fields only; it carries no identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueueLabel(Option<String>);

impl QueueLabel {
    /// Label from any string. Blank strings become anonymous.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        if label.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(label))
        }
    }

    /// A label-less queue.
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// The label text, if any.
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The label text or [`ANONYMOUS_LABEL`].
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or(ANONYMOUS_LABEL)
    }
}

impl fmt::Display for QueueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for QueueLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for QueueLabel {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl<T: Into<String>> From<Option<T>> for QueueLabel {
    fn from(label: Option<T>) -> Self {
        label.map(Self::new).unwrap_or_default()
    }
}

/// Process-unique queue identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueId(u64);

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

impl QueueId {
    /// Allocate the next identifier.
    pub fn next() -> Self {
        Self(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}
