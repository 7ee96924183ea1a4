//! Trailing-edge debounce.
//!
//! A burst of calls inside the window collapses into one trailing call that
//! carries the arguments of the last call in the burst. Intermediate calls are
//! dropped, not queued.

use super::{PageTime, TaskHandle, Timer};
use std::time::Duration;

/// Debounce state without an owned action.
///
/// Useful when the action needs `&mut` access to the owner (the owner polls
/// and runs the action itself).
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    window: Duration,
    timer: Timer,
    latest: Option<A>,
}

impl<A> Debouncer<A> {
    /// Idle debouncer with quiet period `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            timer: Timer::new(),
            latest: None,
        }
    }

    /// The quiet period.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a call. Cancels any pending invocation and re-arms the window
    /// from `now` with `args` as the surviving arguments.
    pub fn call(&mut self, now: PageTime, args: A) -> TaskHandle {
        self.latest = Some(args);
        self.timer.arm(now, self.window)
    }

    /// Return the surviving arguments if the window has elapsed at `now`.
    pub fn poll(&mut self, now: PageTime) -> Option<A> {
        self.timer.fire(now)?;
        self.latest.take()
    }

    /// Drop the pending invocation. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.latest = None;
        self.timer.cancel().is_some()
    }

    /// The armed trailing call, if any.
    pub fn pending(&self) -> Option<TaskHandle> {
        self.timer.pending()
    }

    /// When the trailing call is due.
    pub fn deadline(&self) -> Option<PageTime> {
        self.timer.deadline()
    }
}

/// A debounced action: [`Debouncer`] plus the action it guards.
pub struct Debounced<A, F> {
    inner: Debouncer<A>,
    action: F,
}

/// Wrap `action` so bursts of calls within `window` collapse to one trailing call.
pub fn wrap<A, F, R>(action: F, window: Duration) -> Debounced<A, F>
where
    F: FnMut(A) -> R,
{
    Debounced {
        inner: Debouncer::new(window),
        action,
    }
}

impl<A, F, R> Debounced<A, F>
where
    F: FnMut(A) -> R,
{
    /// Record a call; see [`Debouncer::call`].
    pub fn call(&mut self, now: PageTime, args: A) -> TaskHandle {
        self.inner.call(now, args)
    }

    /// Run the action if the window has elapsed at `now`.
    ///
    /// The action's return value is handed back untouched, errors included.
    pub fn poll(&mut self, now: PageTime) -> Option<R> {
        let args = self.inner.poll(now)?;
        Some((self.action)(args))
    }

    /// Drop the pending invocation. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.inner.cancel()
    }

    /// When the trailing call is due.
    pub fn deadline(&self) -> Option<PageTime> {
        self.inner.deadline()
    }
}

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;
