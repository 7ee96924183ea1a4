//! Acceptance tests: form validation and submit gating.
//!
//! Each test drives a bound form the way the page would (input, blur, submit,
//! timers) and checks what the user sees through the recorded effects.

use festagram_ui::model::{FieldDescriptor, FieldKind, FieldName, FormId, FormState};
use festagram_ui::presentation::{ControlRef, Effect, FieldRef, RecordingPresentation};
use festagram_ui::schedule::PageTime;
use festagram_ui::state::{
    ValidationEngine, ValidationRules, DEFAULT_SUBMIT_FALLBACK, FAILURE_NOTICE,
};

// ===== Test Fixtures =====

fn name(s: &str) -> FieldName {
    FieldName::new(s).expect("valid field name")
}

fn signup_id() -> FormId {
    FormId::new("signup").expect("valid form id")
}

fn field_ref(field: &str) -> FieldRef {
    FieldRef::new(signup_id(), name(field))
}

fn signup_form() -> ValidationEngine {
    let form = FormState::new(
        signup_id(),
        vec![
            FieldDescriptor::new(name("username"), FieldKind::Text).required(),
            FieldDescriptor::new(name("email"), FieldKind::Email).required(),
            FieldDescriptor::new(name("password"), FieldKind::Password).required(),
            FieldDescriptor::new(name("password2"), FieldKind::PasswordConfirm).required(),
            FieldDescriptor::new(name("bio"), FieldKind::Text),
        ],
    )
    .expect("valid form");
    ValidationEngine::bind(form, ValidationRules::default(), DEFAULT_SUBMIT_FALLBACK)
}

fn fill(engine: &mut ValidationEngine, p: &mut RecordingPresentation, values: &[(&str, &str)]) {
    for (field, value) in values {
        engine.on_input(&name(field), value, p);
    }
}

// ===== Rule order =====

#[test]
fn empty_required_email_reports_required_not_format() {
    // GIVEN: a signup form with an empty required email
    let mut engine = signup_form();
    let mut p = RecordingPresentation::new();

    // WHEN: the email field loses focus
    let valid = engine.on_blur(&name("email"), &mut p);

    // THEN: the required message wins over the format rule
    assert!(!valid);
    assert_eq!(
        p.field_error(&field_ref("email")),
        Some("This field is required")
    );
}

#[test]
fn malformed_email_and_short_password_show_their_messages() {
    let mut engine = signup_form();
    let mut p = RecordingPresentation::new();
    fill(&mut engine, &mut p, &[("email", "ana@festagram"), ("password", "abc")]);

    engine.on_blur(&name("email"), &mut p);
    engine.on_blur(&name("password"), &mut p);

    assert_eq!(
        p.field_error(&field_ref("email")),
        Some("Please enter a valid email address")
    );
    assert_eq!(
        p.field_error(&field_ref("password")),
        Some("Password must be at least 6 characters long")
    );
}

// ===== Confirmation freshness =====

#[test]
fn confirmation_rereads_live_password() {
    // GIVEN: matching password and confirmation
    let mut engine = signup_form();
    let mut p = RecordingPresentation::new();
    fill(&mut engine, &mut p, &[("password", "secret1"), ("password2", "secret1")]);
    assert!(engine.validate_field(&name("password2"), &mut p));

    // WHEN: the password changes after the confirmation was typed
    fill(&mut engine, &mut p, &[("password", "secret2")]);

    // THEN: re-validating the confirmation sees the new password
    assert!(!engine.validate_field(&name("password2"), &mut p));
    assert_eq!(
        p.field_error(&field_ref("password2")),
        Some("Passwords do not match")
    );
}

// ===== Input clears errors =====

#[test]
fn typing_clears_error_without_revalidating() {
    let mut engine = signup_form();
    let mut p = RecordingPresentation::new();
    engine.on_blur(&name("username"), &mut p);
    assert!(p.field_error(&field_ref("username")).is_some());

    p.take_effects();
    fill(&mut engine, &mut p, &[("username", "a")]);

    assert_eq!(
        p.effects(),
        &[Effect::ClearFieldError {
            field: field_ref("username")
        }]
    );
    assert!(p.field_error(&field_ref("username")).is_none());
}

// ===== Submit gating =====

#[test]
fn blocked_submit_surfaces_every_error_and_one_notice() {
    // GIVEN: an untouched signup form
    let mut engine = signup_form();
    let mut p = RecordingPresentation::new();

    // WHEN: the user submits
    let allowed = engine.handle_submit(PageTime::ZERO, &mut p);

    // THEN: all four required fields show errors, the optional bio does not,
    // and exactly one aggregate notice appears
    assert!(!allowed);
    for field in ["username", "email", "password", "password2"] {
        assert_eq!(
            p.field_error(&field_ref(field)),
            Some("This field is required"),
            "{field} should be flagged"
        );
    }
    assert!(p.field_error(&field_ref("bio")).is_none());
    assert_eq!(p.notices(), vec![FAILURE_NOTICE]);
    assert!(!engine.is_submitting());
}

#[test]
fn accepted_submit_is_busy_then_released_by_fallback() {
    let mut engine = signup_form();
    let mut p = RecordingPresentation::new();
    fill(
        &mut engine,
        &mut p,
        &[
            ("username", "ana"),
            ("email", "ana@festagram.example"),
            ("password", "secret1"),
            ("password2", "secret1"),
        ],
    );
    let button = ControlRef::SubmitButton { form: signup_id() };

    assert!(engine.handle_submit(PageTime::from_millis(1_000), &mut p));
    assert!(p.is_busy(&button));
    assert_eq!(engine.next_deadline(), Some(PageTime::from_millis(11_000)));

    // Re-entrant submit while in flight is rejected silently.
    let before = p.effects().len();
    assert!(!engine.handle_submit(PageTime::from_millis(2_000), &mut p));
    assert_eq!(p.effects().len(), before);

    engine.advance(PageTime::from_millis(11_000), &mut p);
    assert!(!p.is_busy(&button));
    assert!(!engine.is_submitting());
}
