//! Page clock and deferred tasks (pure).
//!
//! Every deferred action in the core (debounced recompute, navigation delay,
//! submit fallback) is represented as an explicit [`TaskHandle`] on a virtual
//! [`PageTime`] clock. Nothing here sleeps or spawns: the page runtime asks each
//! component for its next deadline and advances time to it.

pub mod debounce;

pub use debounce::{wrap, Debounced, Debouncer};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

// ===== PageTime =====

/// Milliseconds elapsed since the page view was bound.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PageTime(u64);

impl PageTime {
    /// The instant the page was bound.
    pub const ZERO: Self = Self(0);

    /// Time `millis` after page bind.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds since page bind.
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time `delay` after `self`. Saturates instead of overflowing.
    pub fn saturating_add(self, delay: Duration) -> Self {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: PageTime) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for PageTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ===== TaskHandle =====

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one armed task.
///
/// Ids increase with every arm on any [`Timer`], so they record arming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        Self(NEXT_TASK_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Handle to a deferred task armed on a [`Timer`].
///
/// A handle goes stale as soon as its timer is re-armed or cancelled; a stale
/// handle never fires. Handles order by deadline, then by arming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle {
    due: PageTime,
    id: TaskId,
}

impl TaskHandle {
    /// Identity of the task.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// When the task becomes due.
    pub fn due(&self) -> PageTime {
        self.due
    }

    /// Whether the task is due at `now`.
    pub fn is_due(&self, now: PageTime) -> bool {
        now >= self.due
    }
}

// ===== Timer =====

/// Single-slot timer.
///
/// Arming while a task is pending replaces it, which cancels the earlier task.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    armed: Option<TaskHandle>,
}

impl Timer {
    /// An idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a task due `delay` after `now`, replacing any pending task.
    pub fn arm(&mut self, now: PageTime, delay: Duration) -> TaskHandle {
        let handle = TaskHandle {
            due: now.saturating_add(delay),
            id: TaskId::next(),
        };
        self.armed = Some(handle);
        handle
    }

    /// Cancel the pending task, returning it if there was one.
    pub fn cancel(&mut self) -> Option<TaskHandle> {
        self.armed.take()
    }

    /// The task currently armed, if any.
    pub fn pending(&self) -> Option<TaskHandle> {
        self.armed
    }

    /// Due time of the pending task.
    pub fn deadline(&self) -> Option<PageTime> {
        self.armed.map(|h| h.due)
    }

    /// Take the pending task if it is due at `now`.
    ///
    /// Each armed task is returned at most once.
    pub fn fire(&mut self, now: PageTime) -> Option<TaskHandle> {
        match self.armed {
            Some(handle) if handle.is_due(now) => self.armed.take(),
            _ => None,
        }
    }
}

/// Smaller of two optional values (deadlines or task handles).
pub fn earliest<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
