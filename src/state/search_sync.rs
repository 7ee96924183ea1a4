//! Debounced search-state synchronizer.
//!
//! Mirrors the search term and category controls, coalesces keystrokes through a
//! [`Debouncer`], derives the canonical [`QueryState`], writes it into the page
//! location and then navigates to the result.
//!
//! # State Machine
//!
//! ```text
//! Idle --(debounced input | category change)--> Recomputing --> Navigating{target}
//! Navigating --(keystroke | recompute)--> Navigating{target} (same target, same deadline)
//! Navigating --(delay elapses)--> Navigated (terminal)
//! ```
//!
//! There is no path back to `Idle`: every recompute ends in a navigation. The
//! navigation delay only exists so the loading indicator can paint before the
//! blocking page load starts. Results are not fetched asynchronously.
//!
//! # Overlapping recomputes
//!
//! The navigation timer is fire-and-forget: nothing cancels or re-targets it.
//! A recompute that lands inside the delay still rewrites the location and
//! shows the loading state, but the first armed navigation fires on time with
//! the older target. The newer navigation is due later and never runs, since
//! the page is gone by then. This race is kept as is.

use super::location::{Location, CATEGORY_PARAM, SEARCH_PARAM};
use crate::model::QueryState;
use crate::presentation::{Presentation, RegionRef};
use crate::schedule::{earliest, Debouncer, PageTime, TaskHandle, Timer};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default quiet period before a keystroke burst triggers a recompute.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default pause between showing the loading state and navigating.
pub const DEFAULT_NAVIGATION_DELAY: Duration = Duration::from_millis(300);

/// Synchronizer lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPhase {
    /// Bound, nothing recomputed yet.
    Idle,
    /// Deriving the query and location (transient within `recompute`).
    Recomputing,
    /// Location updated; navigation fires when `handle` is due.
    Navigating {
        /// Where the first armed navigation goes.
        target: Url,
        /// The pending navigation task.
        handle: TaskHandle,
    },
    /// Navigation performed. The page view is gone.
    Navigated {
        /// The URL navigated to.
        target: Url,
    },
}

/// Owns the search controls' mirrors and the canonical query of one page.
#[derive(Debug, Clone)]
pub struct SearchStateSynchronizer {
    term: String,
    category: String,
    location: Location,
    query: Option<QueryState>,
    debounce: Debouncer<()>,
    navigation: Timer,
    navigation_delay: Duration,
    results: Option<RegionRef>,
    phase: SyncPhase,
}

impl SearchStateSynchronizer {
    /// Bind to the search controls of a page at `location`.
    ///
    /// The control mirrors start from the server-rendered values, which are the
    /// `search` and `category` parameters of the location.
    pub fn bind(location: Location, debounce: Duration, navigation_delay: Duration) -> Self {
        let term = location.param(SEARCH_PARAM).unwrap_or_default();
        let category = location.param(CATEGORY_PARAM).unwrap_or_default();
        debug!(
            location = %location.as_str(),
            term = %term,
            category = %category,
            "search controls bound"
        );

        Self {
            term,
            category,
            location,
            query: None,
            debounce: Debouncer::new(debounce),
            navigation: Timer::new(),
            navigation_delay,
            results: None,
            phase: SyncPhase::Idle,
        }
    }

    /// Builder: toggle loading on this region when a recompute starts.
    pub fn with_results_region(mut self, region: RegionRef) -> Self {
        self.results = Some(region);
        self
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> &SyncPhase {
        &self.phase
    }

    /// Page location, including every recompute written so far.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Most recently derived query, if any recompute ran.
    pub fn query(&self) -> Option<&QueryState> {
        self.query.as_ref()
    }

    /// Raw text of the term control.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Selected category value (empty for "all").
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether the page has navigated away.
    pub fn is_navigated(&self) -> bool {
        matches!(self.phase, SyncPhase::Navigated { .. })
    }

    /// Keystroke in the term control. Re-arms the debounce window.
    ///
    /// A navigation already waiting out its delay is left alone.
    ///
    /// Returns `None` once the page has navigated away.
    pub fn on_input_changed(&mut self, now: PageTime, text: &str) -> Option<TaskHandle> {
        if self.is_navigated() {
            debug!("search input after navigation ignored");
            return None;
        }
        self.term = text.to_string();
        Some(self.debounce.call(now, ()))
    }

    /// Selection change in the category control. Recomputes immediately.
    pub fn on_category_changed<P: Presentation>(
        &mut self,
        now: PageTime,
        value: &str,
        p: &mut P,
    ) -> Option<Url> {
        if self.is_navigated() {
            debug!("category change after navigation ignored");
            return None;
        }
        self.category = value.to_string();
        self.recompute(now, p)
    }

    /// Derive the query from both controls, write it into the location, show the
    /// loading state and arm the navigation.
    ///
    /// Returns the rewritten location. While a navigation is already pending it
    /// keeps its original target and deadline (see the module docs).
    pub fn recompute<P: Presentation>(&mut self, now: PageTime, p: &mut P) -> Option<Url> {
        if self.is_navigated() {
            debug!("recompute after navigation ignored");
            return None;
        }
        let pending = match std::mem::replace(&mut self.phase, SyncPhase::Recomputing) {
            SyncPhase::Navigating { target, handle } => Some((target, handle)),
            _ => None,
        };

        let query = QueryState::from_controls(&self.term, &self.category);
        let target = self.location.with_query(&query);
        self.location = Location::from(target.clone());
        self.query = Some(query);

        if let Some(region) = &self.results {
            p.set_loading(region, true);
        }

        self.phase = match pending {
            Some((first, handle)) => {
                debug!(
                    url = %target,
                    pending = %first,
                    navigate_at = %handle.due(),
                    "search recomputed while a navigation is pending; it keeps its target"
                );
                SyncPhase::Navigating {
                    target: first,
                    handle,
                }
            }
            None => {
                let handle = self.navigation.arm(now, self.navigation_delay);
                info!(url = %target, navigate_at = %handle.due(), "search query recomputed");
                SyncPhase::Navigating {
                    target: target.clone(),
                    handle,
                }
            }
        };
        Some(target)
    }

    /// Run every task due at `now` in deadline order, ties in arming order.
    pub fn advance<P: Presentation>(&mut self, now: PageTime, p: &mut P) {
        while self.run_next(now, p).is_some() {}
    }

    /// Run the single earliest task if it is due at `now`. Returns the task run.
    pub fn run_next<P: Presentation>(&mut self, now: PageTime, p: &mut P) -> Option<TaskHandle> {
        let task = self.next_task().filter(|task| task.is_due(now))?;
        if self.debounce.pending() == Some(task) {
            if self.debounce.poll(now).is_some() {
                self.recompute(now, p);
            }
        } else {
            let fired = self.navigation.fire(now)?;
            self.navigate(fired, p);
        }
        Some(task)
    }

    /// The next task to run, or `None` once navigated.
    pub fn next_task(&self) -> Option<TaskHandle> {
        if self.is_navigated() {
            return None;
        }
        earliest(self.debounce.pending(), self.navigation.pending())
    }

    /// When [`next_task`](Self::next_task) is due.
    pub fn next_deadline(&self) -> Option<PageTime> {
        self.next_task().map(|task| task.due())
    }

    fn navigate<P: Presentation>(&mut self, fired: TaskHandle, p: &mut P) {
        match &self.phase {
            SyncPhase::Navigating { target, handle } if *handle == fired => {
                let target = target.clone();
                info!(url = %target, "navigating to search results");
                p.navigate_to(&target);
                self.phase = SyncPhase::Navigated { target };
            }
            _ => debug!(at = %fired.due(), "stale navigation timer ignored"),
        }
    }
}

#[cfg(test)]
#[path = "search_sync_tests.rs"]
mod tests;
