//! Form validation engine and submit gating.
//!
//! Owns one [`FormState`]. Field checks are pure ([`evaluate`]); the engine applies
//! the result to the field and mirrors it through the [`Presentation`] capability.
//!
//! # Event mapping
//!
//! - blur → [`ValidationEngine::on_blur`] (validate that field)
//! - input → [`ValidationEngine::on_input`] (store value, clear error, no re-validation)
//! - submit → [`ValidationEngine::handle_submit`]
//! - timer → [`ValidationEngine::advance`] (submit fallback reset)

use crate::model::{
    BindingError, FieldDescriptor, FieldError, FieldKind, FieldName, FormId, FormState,
};
use crate::presentation::{ControlRef, FieldRef, Presentation};
use crate::schedule::{PageTime, TaskHandle, Timer};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Notice shown once when a submission is blocked by field errors.
pub const FAILURE_NOTICE: &str = "Please fix the errors in the form";

/// Default minimum password length.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Default time after which a busy submit control is re-enabled.
pub const DEFAULT_SUBMIT_FALLBACK: Duration = Duration::from_millis(10_000);

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Tunable rule parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Fewer characters than this fail the password rule.
    pub min_password_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// Evaluate one field's rule chain. First failing rule wins.
///
/// Order: required → email format → password length → confirmation match.
/// `password` is the live raw value of the form's `password` sibling, compared
/// against the trimmed confirmation; when it is `None` the rule is skipped.
pub fn evaluate(
    field: &FieldDescriptor,
    password: Option<&str>,
    rules: &ValidationRules,
) -> Option<FieldError> {
    let value = field.trimmed_value();

    if value.is_empty() {
        return field.is_required().then_some(FieldError::Required);
    }

    match field.kind() {
        FieldKind::Email if !EMAIL_PATTERN.is_match(value) => Some(FieldError::InvalidEmail),
        FieldKind::Password if value.chars().count() < rules.min_password_length => {
            Some(FieldError::TooShort {
                min: rules.min_password_length,
            })
        }
        FieldKind::PasswordConfirm => match password {
            Some(password) if password != value => Some(FieldError::Mismatch),
            _ => None,
        },
        _ => None,
    }
}

/// Validation and submission state for one bound form.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    form: FormState,
    rules: ValidationRules,
    submit_fallback: Duration,
    /// One per accepted submission.
    fallbacks: Vec<Timer>,
    issues: Vec<BindingError>,
    reported_unknown: HashSet<FieldName>,
    detached: bool,
}

impl ValidationEngine {
    /// Bind to a form.
    ///
    /// Soft configuration problems (a confirmation field without a `password`
    /// sibling) are logged here, once, and kept in [`issues`](Self::issues).
    pub fn bind(form: FormState, rules: ValidationRules, submit_fallback: Duration) -> Self {
        let issues = binding_issues(&form);
        for issue in &issues {
            warn!(form = %form.id(), error = %issue, "form binding is misconfigured");
        }
        debug!(form = %form.id(), fields = form.fields().len(), "form bound");

        Self {
            form,
            rules,
            submit_fallback,
            fallbacks: Vec::new(),
            issues,
            reported_unknown: HashSet::new(),
            detached: false,
        }
    }

    /// The bound form.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Identifier of the bound form.
    pub fn form_id(&self) -> &FormId {
        self.form.id()
    }

    /// Whether an accepted submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    /// Configuration problems detected at bind time or on unknown-field events.
    pub fn issues(&self) -> &[BindingError] {
        &self.issues
    }

    /// The form's submit button.
    pub fn submit_control(&self) -> ControlRef {
        ControlRef::SubmitButton {
            form: self.form.id().clone(),
        }
    }

    /// Validate one field by name, updating its error state and inline message.
    ///
    /// Unknown names are a configuration error: logged once, treated as valid.
    pub fn validate_field<P: Presentation>(&mut self, name: &FieldName, p: &mut P) -> bool {
        if self.detached {
            debug!(form = %self.form.id(), field = %name, "validation after detach ignored");
            return true;
        }
        match self.form.position(name) {
            Some(index) => self.validate_at(index, p),
            None => {
                self.report_unknown(name);
                true
            }
        }
    }

    /// Validate every field that is required or carries a format rule.
    ///
    /// All fields are checked so every error is surfaced at once.
    pub fn validate_form<P: Presentation>(&mut self, p: &mut P) -> bool {
        if self.detached {
            return true;
        }
        let checked: Vec<usize> = self
            .form
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_checked_on_submit())
            .map(|(i, _)| i)
            .collect();

        checked
            .into_iter()
            .fold(true, |all_valid, index| self.validate_at(index, p) && all_valid)
    }

    /// Gate a submit attempt. Returns whether the default submit should proceed.
    ///
    /// Re-entrant attempts while a submission is in flight are rejected without
    /// effects. A blocked submission produces one aggregate notice.
    pub fn handle_submit<P: Presentation>(&mut self, now: PageTime, p: &mut P) -> bool {
        if self.detached {
            debug!(form = %self.form.id(), "submit after detach ignored");
            return false;
        }
        if self.form.is_submitting() {
            debug!(form = %self.form.id(), "submission already in flight; rejected");
            return false;
        }

        if !self.validate_form(p) {
            let failing: Vec<&str> = self
                .form
                .fields()
                .iter()
                .filter(|f| !f.is_valid())
                .map(|f| f.name().as_str())
                .collect();
            info!(form = %self.form.id(), ?failing, "submission blocked by validation");
            p.show_aggregate_failure_notice(FAILURE_NOTICE);
            return false;
        }

        self.form.begin_submit();
        p.set_busy(&self.submit_control(), true);
        let mut fallback = Timer::new();
        let handle = fallback.arm(now, self.submit_fallback);
        self.fallbacks.push(fallback);
        info!(form = %self.form.id(), fallback_at = %handle.due(), "submission allowed");
        true
    }

    /// Roll back an allowed submission that a later gate refused.
    ///
    /// The fallback stays armed and later fires as a no-op reset.
    pub fn cancel_submit<P: Presentation>(&mut self, p: &mut P) {
        if !self.form.is_submitting() {
            return;
        }
        self.form.end_submit();
        p.set_busy(&self.submit_control(), false);
        debug!(form = %self.form.id(), "submission withdrawn");
    }

    /// Loss of focus: validate the field.
    pub fn on_blur<P: Presentation>(&mut self, name: &FieldName, p: &mut P) -> bool {
        self.validate_field(name, p)
    }

    /// Edit: store the new value and optimistically clear any error.
    pub fn on_input<P: Presentation>(&mut self, name: &FieldName, value: &str, p: &mut P) {
        if self.detached {
            return;
        }
        let Some(index) = self.form.position(name) else {
            self.report_unknown(name);
            return;
        };
        let form_id = self.form.id().clone();
        let Some(field) = self.form.field_at_mut(index) else {
            return;
        };
        field.set_value(value.to_string());
        if field.error().is_some() {
            field.set_error(None);
            p.clear_field_error(&FieldRef::new(form_id, name.clone()));
        }
    }

    /// Fire every submit fallback due at `now`.
    pub fn advance<P: Presentation>(&mut self, now: PageTime, p: &mut P) {
        while self.run_next(now, p).is_some() {}
    }

    /// Fire the earliest submit fallback if it is due at `now`. Returns the task run.
    ///
    /// A fallback re-enables the control even if a later submission is still in
    /// flight.
    pub fn run_next<P: Presentation>(&mut self, now: PageTime, p: &mut P) -> Option<TaskHandle> {
        let task = self.next_task().filter(|task| task.is_due(now))?;
        let index = self
            .fallbacks
            .iter()
            .position(|timer| timer.pending() == Some(task))?;
        self.fallbacks.remove(index).fire(now)?;

        if self.detached {
            debug!(form = %self.form.id(), "fallback reset after detach ignored");
            return Some(task);
        }
        self.form.end_submit();
        p.set_busy(&self.submit_control(), false);
        info!(form = %self.form.id(), at = %task.due(), "submit control re-enabled by fallback");
        Some(task)
    }

    /// The earliest armed fallback reset, if any.
    pub fn next_task(&self) -> Option<TaskHandle> {
        self.fallbacks.iter().filter_map(Timer::pending).min()
    }

    /// When the earliest fallback reset is due.
    pub fn next_deadline(&self) -> Option<PageTime> {
        self.next_task().map(|task| task.due())
    }

    /// The page is going away; every later event or timer is a no-op.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Whether [`detach`](Self::detach) has been called.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    fn validate_at<P: Presentation>(&mut self, index: usize, p: &mut P) -> bool {
        let Some(field) = self.form.fields().get(index) else {
            return true;
        };
        let outcome = evaluate(field, self.form.password_value(), &self.rules);
        let field_ref = FieldRef::new(self.form.id().clone(), field.name().clone());

        match outcome {
            Some(error) => {
                debug!(form = %field_ref.form, field = %field_ref.field, code = error.code(), "field invalid");
                p.show_field_error(&field_ref, &error.to_string());
            }
            None => p.clear_field_error(&field_ref),
        }
        if let Some(field) = self.form.field_at_mut(index) {
            field.set_error(outcome);
        }
        outcome.is_none()
    }

    fn report_unknown(&mut self, name: &FieldName) {
        if self.reported_unknown.insert(name.clone()) {
            let issue = BindingError::UnknownField {
                form: self.form.id().clone(),
                field: name.clone(),
            };
            warn!(error = %issue, "event for unbound field");
            self.issues.push(issue);
        }
    }
}

fn binding_issues(form: &FormState) -> Vec<BindingError> {
    if form.password_value().is_some() {
        return Vec::new();
    }
    form.fields()
        .iter()
        .filter(|f| f.kind() == FieldKind::PasswordConfirm)
        .map(|f| BindingError::MissingPasswordSibling {
            form: form.id().clone(),
            field: f.name().clone(),
        })
        .collect()
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
