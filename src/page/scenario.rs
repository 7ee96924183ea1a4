//! Replay scenarios: a page description plus an event timeline, loaded from JSON.
//!
//! ```json
//! {
//!   "location": "https://festagram.example/events?page=2",
//!   "forms": [{ "id": "login", "fields": [{ "name": "username", "required": true }] }],
//!   "search": {},
//!   "events": [{ "at": 0, "type": "search_input", "value": "jazz" }]
//! }
//! ```

use super::{PageRuntime, TimedEvent};
use crate::config::ResolvedConfig;
use crate::model::{FieldDescriptor, FieldKind, FieldName, FormId, FormState, ScenarioError};
use crate::presentation::{RecordingPresentation, RegionRef};
use crate::state::{Location, RegistrationGate, SearchStateSynchronizer, ValidationEngine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A page description plus the events to replay against it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Absolute URL of the page view.
    pub location: String,
    /// Wall-clock time of page load, used for relative timestamps.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Forms on the page.
    #[serde(default)]
    pub forms: Vec<FormSpec>,
    /// Present when the page carries the search controls.
    #[serde(default)]
    pub search: Option<SearchSpec>,
    /// Timestamp elements to label on mount.
    #[serde(default)]
    pub timestamps: Vec<TimestampSpec>,
    /// Scripted answers for confirmation prompts, in order.
    #[serde(default)]
    pub confirm_answers: Vec<bool>,
    /// Timeline to replay, in page-time order.
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

/// One `<form>` element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSpec {
    /// Form identifier.
    pub id: FormId,
    /// The form's `action` attribute.
    #[serde(default)]
    pub action: Option<String>,
    /// Whether the form opts into client-side validation.
    #[serde(default = "enabled")]
    pub validate: bool,
    /// Inputs in document order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One input inside a form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Input name.
    pub name: FieldName,
    /// Input type.
    #[serde(default)]
    pub kind: FieldKind,
    /// Whether the input carries `required`.
    #[serde(default)]
    pub required: bool,
    /// Server-rendered initial value.
    #[serde(default)]
    pub value: String,
}

/// The search term and category controls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSpec {
    /// Whether the page has a results region to mark as loading.
    #[serde(default = "enabled")]
    pub results_region: bool,
}

impl Default for SearchSpec {
    fn default() -> Self {
        Self {
            results_region: true,
        }
    }
}

/// A timestamp element to annotate with its relative time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimestampSpec {
    /// Element identifier passed back to the presentation layer.
    pub target: String,
    /// The instant the element shows.
    pub at: DateTime<Utc>,
}

fn enabled() -> bool {
    true
}

impl FieldSpec {
    fn descriptor(&self) -> FieldDescriptor {
        let descriptor =
            FieldDescriptor::new(self.name.clone(), self.kind).with_value(self.value.clone());
        if self.required {
            descriptor.required()
        } else {
            descriptor
        }
    }
}

/// Read and parse a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ScenarioError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Scenario {
    /// Bind every component the scenario describes.
    ///
    /// Without an explicit `now`, timestamps are labelled against the current time.
    pub fn build(&self, config: &ResolvedConfig) -> Result<PageRuntime, ScenarioError> {
        let location = Location::parse(&self.location)?;
        let mut runtime = PageRuntime::new(self.now.unwrap_or_else(Utc::now));

        for spec in &self.forms {
            if spec.validate {
                let fields = spec.fields.iter().map(FieldSpec::descriptor).collect();
                let form = FormState::new(spec.id.clone(), fields)?;
                runtime = runtime.with_form(ValidationEngine::bind(
                    form,
                    config.validation_rules(),
                    config.submit_fallback,
                ));
            }

            match spec.action.as_deref() {
                Some(action) => match RegistrationGate::bind(spec.id.clone(), action) {
                    Some(gate) => runtime = runtime.with_registration(gate),
                    None => debug!(form = %spec.id, action, "not a registration form"),
                },
                None if !spec.validate => {
                    warn!(form = %spec.id, "form has neither validation nor a registration action")
                }
                None => {}
            }
        }

        if let Some(spec) = &self.search {
            let mut search =
                SearchStateSynchronizer::bind(location, config.debounce, config.navigation_delay);
            if spec.results_region {
                search = search.with_results_region(RegionRef::SearchResults);
            }
            runtime = runtime.with_search(search);
        }

        for timestamp in &self.timestamps {
            runtime = runtime.with_timestamp(timestamp.clone());
        }

        Ok(runtime)
    }

    /// Recording presentation primed with the scripted confirmation answers.
    pub fn presentation(&self) -> RecordingPresentation {
        RecordingPresentation::with_confirm_answers(self.confirm_answers.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BindingError;
    use crate::page::PageEvent;
    use crate::schedule::PageTime;

    const MINIMAL: &str = r#"{ "location": "https://festagram.example/events" }"#;

    #[test]
    fn minimal_scenario_uses_defaults() {
        let scenario: Scenario = serde_json::from_str(MINIMAL).expect("parse scenario");

        assert!(scenario.forms.is_empty());
        assert!(scenario.search.is_none());
        assert!(scenario.events.is_empty());
        assert_eq!(scenario.now, None);
    }

    #[test]
    fn form_and_field_defaults_apply() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "location": "https://festagram.example/login",
                "forms": [{ "id": "login", "fields": [{ "name": "username" }] }]
            }"#,
        )
        .expect("parse scenario");

        let form = &scenario.forms[0];
        assert!(form.validate);
        assert_eq!(form.action, None);
        assert_eq!(form.fields[0].kind, FieldKind::Text);
        assert!(!form.fields[0].required);
        assert_eq!(form.fields[0].value, "");
    }

    #[test]
    fn events_parse_with_flattened_type_tag() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "location": "https://festagram.example/events",
                "search": {},
                "events": [
                    { "at": 120, "type": "search_input", "value": "jazz" },
                    { "at": 900, "type": "unload" }
                ]
            }"#,
        )
        .expect("parse scenario");

        assert_eq!(scenario.events[0].at, PageTime::from_millis(120));
        assert_eq!(
            scenario.events[0].event,
            PageEvent::SearchInput {
                value: "jazz".to_string()
            }
        );
        assert_eq!(scenario.events[1].event, PageEvent::Unload);
        assert_eq!(scenario.search, Some(SearchSpec::default()));
    }

    #[test]
    fn unknown_scenario_keys_are_rejected() {
        let result: Result<Scenario, _> = serde_json::from_str(
            r#"{ "location": "https://festagram.example/", "theme": "dark" }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn build_rejects_relative_location() {
        let scenario = Scenario {
            location: "/events".to_string(),
            ..serde_json::from_str(MINIMAL).expect("parse scenario")
        };

        let result = scenario.build(&ResolvedConfig::default());
        assert!(matches!(result, Err(ScenarioError::Location(_))));
    }

    #[test]
    fn build_rejects_duplicate_field_names() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "location": "https://festagram.example/register",
                "forms": [{ "id": "register", "fields": [
                    { "name": "email", "kind": "email" },
                    { "name": "email", "kind": "email" }
                ] }]
            }"#,
        )
        .expect("parse scenario");

        let result = scenario.build(&ResolvedConfig::default());
        assert!(matches!(
            result,
            Err(ScenarioError::Binding(BindingError::DuplicateField { .. }))
        ));
    }

    #[test]
    fn build_binds_validation_registration_and_search() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "location": "https://festagram.example/events/7",
                "forms": [
                    { "id": "login", "fields": [{ "name": "username", "required": true }] },
                    { "id": "rsvp", "action": "/events/7/register_event", "validate": false }
                ],
                "search": { "results_region": false }
            }"#,
        )
        .expect("parse scenario");

        let runtime = scenario
            .build(&ResolvedConfig::default())
            .expect("build runtime");

        assert_eq!(runtime.forms().len(), 1);
        assert!(runtime
            .form(&FormId::new("login").expect("valid id"))
            .is_some());
        assert!(runtime
            .form(&FormId::new("rsvp").expect("valid id"))
            .is_none());
        assert!(runtime.search().is_some());
    }

    #[test]
    fn load_scenario_reports_missing_file() {
        let result = load_scenario(Path::new("/nonexistent/festagram/scenario.json"));
        assert!(matches!(result, Err(ScenarioError::Read { .. })));
    }

    #[test]
    fn load_scenario_reports_invalid_json() {
        let path = std::env::temp_dir().join("festagram_ui_invalid_scenario.json");
        std::fs::write(&path, "{ not json").expect("write scenario");

        let result = load_scenario(&path);
        assert!(matches!(result, Err(ScenarioError::Parse { .. })));

        std::fs::remove_file(path).ok();
    }
}
