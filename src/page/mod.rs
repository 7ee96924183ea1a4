//! Page runtime: binds the interaction components of one page view and drives
//! them from a timeline of DOM events on the virtual clock.
//!
//! Timers are fired in deadline order before each event is dispatched, so a
//! timeline replays exactly as the browser's event loop would run it. Timers
//! due at the same instant run in the order they were armed, across components.

pub mod scenario;

pub use scenario::{load_scenario, FieldSpec, FormSpec, Scenario, SearchSpec, TimestampSpec};

use crate::model::{format_relative_time, BindingError, FieldName, FormId};
use crate::presentation::{Effect, Presentation, RecordingPresentation};
use crate::schedule::{earliest, PageTime, TaskHandle};
use crate::state::{RegistrationGate, SearchStateSynchronizer, ValidationEngine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

// ===== Events =====

/// A DOM event delivered to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// A field's value changed.
    FieldInput {
        /// Owning form.
        form: FormId,
        /// Edited field.
        field: FieldName,
        /// Raw value after the edit.
        value: String,
    },
    /// A field lost focus.
    FieldBlur {
        /// Owning form.
        form: FormId,
        /// Field that lost focus.
        field: FieldName,
    },
    /// A form's submit was triggered.
    Submit {
        /// Form being submitted.
        form: FormId,
    },
    /// Keystroke in the search term control.
    SearchInput {
        /// Raw text of the control.
        value: String,
    },
    /// The category select changed.
    CategoryChange {
        /// Selected value; empty for "all".
        value: String,
    },
    /// The page is being torn down.
    Unload,
}

/// An event scheduled at a point on the page clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// When the event is delivered.
    pub at: PageTime,
    /// The event itself.
    #[serde(flatten)]
    pub event: PageEvent,
}

// ===== Replay output =====

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplayItem {
    /// A UI effect.
    Effect(Effect),
    /// Outcome of a submit event: whether the default submission went ahead.
    Submission {
        /// Submitted form.
        submission: FormId,
        /// Whether the default submission proceeded.
        allowed: bool,
    },
}

/// A replay item stamped with the page time it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedEntry {
    /// Page time of the item.
    pub at: PageTime,
    /// What happened.
    #[serde(flatten)]
    pub item: ReplayItem,
}

// ===== PageRuntime =====

/// Component owning a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TaskOwner {
    Form(usize),
    Search,
}

/// The interaction components bound to one page view, on one virtual clock.
#[derive(Debug, Clone)]
pub struct PageRuntime {
    now: PageTime,
    wall_clock: DateTime<Utc>,
    forms: Vec<ValidationEngine>,
    registrations: Vec<RegistrationGate>,
    search: Option<SearchStateSynchronizer>,
    timestamps: Vec<TimestampSpec>,
    issues: Vec<BindingError>,
    reported_forms: HashSet<FormId>,
    reported_missing_search: bool,
    detached: bool,
}

impl PageRuntime {
    /// Empty page. `wall_clock` is the real time at which the page was bound.
    pub fn new(wall_clock: DateTime<Utc>) -> Self {
        Self {
            now: PageTime::ZERO,
            wall_clock,
            forms: Vec::new(),
            registrations: Vec::new(),
            search: None,
            timestamps: Vec::new(),
            issues: Vec::new(),
            reported_forms: HashSet::new(),
            reported_missing_search: false,
            detached: false,
        }
    }

    /// Bind a validated form.
    pub fn with_form(mut self, engine: ValidationEngine) -> Self {
        self.forms.push(engine);
        self
    }

    /// Bind a registration form.
    pub fn with_registration(mut self, gate: RegistrationGate) -> Self {
        self.registrations.push(gate);
        self
    }

    /// Bind the search controls.
    pub fn with_search(mut self, search: SearchStateSynchronizer) -> Self {
        self.search = Some(search);
        self
    }

    /// Add a timestamp element to label on mount.
    pub fn with_timestamp(mut self, timestamp: TimestampSpec) -> Self {
        self.timestamps.push(timestamp);
        self
    }

    /// Current page time.
    pub fn now(&self) -> PageTime {
        self.now
    }

    /// Validated forms in binding order.
    pub fn forms(&self) -> &[ValidationEngine] {
        &self.forms
    }

    /// Validated form by id.
    pub fn form(&self, id: &FormId) -> Option<&ValidationEngine> {
        self.forms.iter().find(|engine| engine.form_id() == id)
    }

    /// The search synchronizer, if the page has search controls.
    pub fn search(&self) -> Option<&SearchStateSynchronizer> {
        self.search.as_ref()
    }

    /// Whether the page has navigated away or unloaded.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Events the page could not route, each reported once.
    pub fn issues(&self) -> &[BindingError] {
        &self.issues
    }

    /// Initial render: label every timestamp element with its relative time.
    pub fn mount<P: Presentation>(&self, p: &mut P) {
        for timestamp in &self.timestamps {
            let label = format_relative_time(self.wall_clock, timestamp.at);
            p.annotate_timestamp(&timestamp.target, &label);
        }
    }

    /// Earliest pending deadline across all components.
    pub fn next_deadline(&self) -> Option<PageTime> {
        self.next_task().map(|(task, _)| task.due())
    }

    /// Run the earliest pending task, if it is not due after `limit`.
    ///
    /// Returns the time the task ran at.
    pub fn fire_next<P: Presentation>(&mut self, limit: PageTime, p: &mut P) -> Option<PageTime> {
        let (task, owner) = self.next_task().filter(|(task, _)| task.due() <= limit)?;
        self.now = self.now.max(task.due());

        match owner {
            TaskOwner::Form(index) => {
                if let Some(engine) = self.forms.get_mut(index) {
                    engine.run_next(self.now, p);
                }
            }
            TaskOwner::Search => {
                if let Some(search) = &mut self.search {
                    search.run_next(self.now, p);
                    if search.is_navigated() {
                        info!(at = %self.now, "page navigated away");
                        self.detach();
                    }
                }
            }
        }
        Some(self.now)
    }

    /// Run every task due up to and including `target`, then move the clock there.
    pub fn advance_to<P: Presentation>(&mut self, target: PageTime, p: &mut P) {
        while self.fire_next(target, p).is_some() {}
        self.now = self.now.max(target);
    }

    /// Deliver one event at the current time.
    ///
    /// Returns the submission outcome for `Submit`, `None` for everything else.
    pub fn dispatch<P: Presentation>(&mut self, event: &PageEvent, p: &mut P) -> Option<bool> {
        if self.detached {
            debug!(?event, "event after detach ignored");
            return None;
        }
        let now = self.now;

        match event {
            PageEvent::FieldInput { form, field, value } => {
                if let Some(engine) = self.engine_mut(form) {
                    engine.on_input(field, value, p);
                }
                None
            }
            PageEvent::FieldBlur { form, field } => {
                if let Some(engine) = self.engine_mut(form) {
                    engine.on_blur(field, p);
                }
                None
            }
            PageEvent::Submit { form } => self.submit(form, p),
            PageEvent::SearchInput { value } => {
                match &mut self.search {
                    Some(search) => {
                        search.on_input_changed(now, value);
                    }
                    None => self.report_missing_search(),
                }
                None
            }
            PageEvent::CategoryChange { value } => {
                match &mut self.search {
                    Some(search) => {
                        search.on_category_changed(now, value, p);
                    }
                    None => self.report_missing_search(),
                }
                None
            }
            PageEvent::Unload => {
                info!(at = %now, "page unloaded");
                self.detach();
                None
            }
        }
    }

    /// Replay a timeline against a recording presentation.
    ///
    /// Events later than `until` are dropped. Without `until`, time runs on
    /// until no task is left pending.
    pub fn replay(
        &mut self,
        events: &[TimedEvent],
        until: Option<PageTime>,
        p: &mut RecordingPresentation,
    ) -> Vec<TimedEntry> {
        let limit = until.unwrap_or(PageTime::from_millis(u64::MAX));
        let mut log = Vec::new();

        self.mount(p);
        record(&mut log, self.now, p);

        for timed in events {
            if timed.at > limit {
                debug!(at = %timed.at, until = %limit, "event past replay horizon dropped");
                break;
            }
            if timed.at < self.now {
                warn!(at = %timed.at, now = %self.now, "out-of-order event delivered late");
            }
            while let Some(at) = self.fire_next(timed.at, p) {
                record(&mut log, at, p);
            }
            self.now = self.now.max(timed.at);

            let outcome = self.dispatch(&timed.event, p);
            record(&mut log, self.now, p);
            if let (PageEvent::Submit { form }, Some(allowed)) = (&timed.event, outcome) {
                log.push(TimedEntry {
                    at: self.now,
                    item: ReplayItem::Submission {
                        submission: form.clone(),
                        allowed,
                    },
                });
            }
        }

        while let Some(at) = self.fire_next(limit, p) {
            record(&mut log, at, p);
        }
        if let Some(until) = until {
            self.now = self.now.max(until);
        }
        log
    }

    /// Pending task with the earliest (deadline, arming order) across components.
    fn next_task(&self) -> Option<(TaskHandle, TaskOwner)> {
        if self.detached {
            return None;
        }
        let forms = self
            .forms
            .iter()
            .enumerate()
            .filter_map(|(index, engine)| Some((engine.next_task()?, TaskOwner::Form(index))))
            .min();
        let search = self
            .search
            .as_ref()
            .and_then(|search| Some((search.next_task()?, TaskOwner::Search)));
        earliest(forms, search)
    }

    fn engine_mut(&mut self, id: &FormId) -> Option<&mut ValidationEngine> {
        let Some(index) = self.forms.iter().position(|engine| engine.form_id() == id) else {
            if self.registrations.iter().any(|gate| gate.form_id() == id) {
                debug!(form = %id, "field event on a registration form ignored");
            } else {
                self.report_unknown_form(id);
            }
            return None;
        };
        self.forms.get_mut(index)
    }

    /// Validation runs first; a registration gate only sees valid submissions.
    fn submit<P: Presentation>(&mut self, id: &FormId, p: &mut P) -> Option<bool> {
        let now = self.now;
        let bound = self.forms.iter().any(|engine| engine.form_id() == id)
            || self.registrations.iter().any(|gate| gate.form_id() == id);
        if !bound {
            self.report_unknown_form(id);
            return None;
        }
        let engine = self.forms.iter_mut().find(|engine| engine.form_id() == id);
        let gate = self.registrations.iter().find(|gate| gate.form_id() == id);

        let allowed = match (engine, gate) {
            (None, None) => return None,
            (Some(engine), None) => engine.handle_submit(now, p),
            (None, Some(gate)) => gate.handle_submit(p),
            (Some(engine), Some(gate)) => {
                if !engine.handle_submit(now, p) {
                    false
                } else if gate.handle_submit(p) {
                    true
                } else {
                    engine.cancel_submit(p);
                    false
                }
            }
        };
        Some(allowed)
    }

    fn report_unknown_form(&mut self, id: &FormId) {
        if self.reported_forms.insert(id.clone()) {
            let issue = BindingError::UnknownForm { form: id.clone() };
            warn!(error = %issue, "event for an unbound form");
            self.issues.push(issue);
        }
    }

    fn report_missing_search(&mut self) {
        if !self.reported_missing_search {
            self.reported_missing_search = true;
            let issue = BindingError::MissingSearchControls;
            warn!(error = %issue, "search event on a page without search controls");
            self.issues.push(issue);
        }
    }

    fn detach(&mut self) {
        self.detached = true;
        for engine in &mut self.forms {
            engine.detach();
        }
    }
}

fn record(log: &mut Vec<TimedEntry>, at: PageTime, p: &mut RecordingPresentation) {
    log.extend(p.take_effects().into_iter().map(|effect| TimedEntry {
        at,
        item: ReplayItem::Effect(effect),
    }));
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
