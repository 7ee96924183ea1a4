//! Property-based tests for identifier, validation, debounce and location invariants.
//!
//! Tests validate:
//! 1. Identifier constructors reject blank strings
//! 2. Field validation is idempotent
//! 3. A burst of debounced calls collapses into one call with the latest args
//! 4. Rewriting the location never keeps `page` and never leaves stale search params

use festagram_ui::model::{FieldDescriptor, FieldKind, FieldName, FormId, FormState, QueryState};
use festagram_ui::presentation::{FieldRef, RecordingPresentation};
use festagram_ui::schedule::{wrap, PageTime};
use festagram_ui::state::{Location, ValidationEngine, ValidationRules, DEFAULT_SUBMIT_FALLBACK};
use proptest::prelude::*;
use std::time::Duration;

// ===== Property 1: Identifier Constructors =====

proptest! {
    #[test]
    fn field_name_rejects_blank_string(s in "[ \t\n]{0,8}") {
        prop_assert!(FieldName::new(s).is_err(), "Blank name should be rejected");
    }

    #[test]
    fn form_id_rejects_blank_string(s in "[ \t\n]{0,8}") {
        prop_assert!(FormId::new(s).is_err(), "Blank id should be rejected");
    }

    #[test]
    fn field_name_accepts_non_blank_string(s in "[a-z_][a-z0-9_]{0,15}") {
        let name = FieldName::new(s.clone()).expect("non-blank name");
        prop_assert_eq!(name.as_str(), s.as_str());
    }
}

// ===== Property 2: Validation Idempotence =====

fn kind_strategy() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::Text),
        Just(FieldKind::Email),
        Just(FieldKind::Password),
        Just(FieldKind::PasswordConfirm),
    ]
}

proptest! {
    #[test]
    fn validate_field_is_idempotent(
        kind in kind_strategy(),
        required in any::<bool>(),
        value in "[ a-z@.]{0,12}",
        password in "[a-z]{0,8}",
    ) {
        let form_id = FormId::new("signup").expect("valid id");
        let target = FieldName::new("target").expect("valid name");
        let mut descriptor = FieldDescriptor::new(target.clone(), kind).with_value(value);
        if required {
            descriptor = descriptor.required();
        }
        let form = FormState::new(
            form_id.clone(),
            vec![
                FieldDescriptor::new(FieldName::new("password").expect("valid name"), FieldKind::Password)
                    .with_value(password),
                descriptor,
            ],
        )
        .expect("valid form");
        let mut engine = ValidationEngine::bind(form, ValidationRules::default(), DEFAULT_SUBMIT_FALLBACK);
        let mut p = RecordingPresentation::new();
        let field_ref = FieldRef::new(form_id, target.clone());

        let first = engine.validate_field(&target, &mut p);
        let first_error = engine.form().field(&target).and_then(|f| f.error());
        let first_message = p.field_error(&field_ref).map(str::to_string);

        let second = engine.validate_field(&target, &mut p);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_error, engine.form().field(&target).and_then(|f| f.error()));
        prop_assert_eq!(first_message.as_deref(), p.field_error(&field_ref));
    }
}

// ===== Property 3: Debounce Coalescing =====

proptest! {
    #[test]
    fn debounced_burst_fires_once_with_latest_args(
        gaps in prop::collection::vec(0u64..300, 1..12),
    ) {
        let window = Duration::from_millis(300);
        let mut debounced = wrap(|n: usize| n, window);

        let mut now = 0u64;
        let mut calls = 0usize;
        let mut fired = Vec::new();
        for gap in &gaps {
            now += gap;
            // Every gap is shorter than the window, so nothing is due yet.
            if let Some(n) = debounced.poll(PageTime::from_millis(now)) {
                fired.push(n);
            }
            debounced.call(PageTime::from_millis(now), calls);
            calls += 1;
        }
        if let Some(n) = debounced.poll(PageTime::from_millis(now + 300)) {
            fired.push(n);
        }
        prop_assert!(debounced.poll(PageTime::from_millis(now + 10_000)).is_none());

        prop_assert_eq!(fired, vec![calls - 1]);
    }
}

// ===== Property 4: Location Rewriting =====

proptest! {
    #[test]
    fn rewritten_location_never_keeps_page(
        term in "[ a-z]{0,10}",
        category in prop_oneof![Just(""), Just("music"), Just("sports")],
        page in 1u32..50,
    ) {
        let location = Location::parse(&format!(
            "https://festagram.example/events?page={page}&search=old&category=film"
        ))
        .expect("valid location");
        let query = QueryState::from_controls(&term, category);

        let rewritten = Location::from(location.with_query(&query));

        prop_assert_eq!(rewritten.param("page"), None);
        prop_assert_eq!(rewritten.param("search"), query.term().map(str::to_string));
        prop_assert_eq!(rewritten.param("category"), query.category().map(str::to_string));
    }
}
