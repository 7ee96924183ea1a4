//! Presentation-layer capability.
//!
//! The core never touches the DOM or `window` directly. Every visible effect goes
//! through [`Presentation`], which the page shell implements (and tests replace with
//! [`RecordingPresentation`]).

pub mod recording;

pub use recording::{Effect, RecordingPresentation};

use crate::model::{FieldName, FormId};
use serde::Serialize;
use url::Url;

/// A field inside a specific form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldRef {
    /// Owning form.
    pub form: FormId,
    /// Field name.
    pub field: FieldName,
}

impl FieldRef {
    /// Reference `field` in `form`.
    pub fn new(form: FormId, field: FieldName) -> Self {
        Self { form, field }
    }
}

/// A control whose busy/disabled state the core toggles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlRef {
    /// The `[type=submit]` control of a form.
    SubmitButton {
        /// Owning form.
        form: FormId,
    },
}

/// A page region whose loading state the core toggles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionRef {
    /// The events grid / search results container.
    SearchResults,
    /// The element wrapping a form's submit control.
    SubmitContainer {
        /// Owning form.
        form: FormId,
    },
}

/// Effects the core asks the page to perform.
pub trait Presentation {
    /// Show an inline error next to a field.
    fn show_field_error(&mut self, field: &FieldRef, message: &str);

    /// Remove a field's inline error.
    fn clear_field_error(&mut self, field: &FieldRef);

    /// One top-level notice for a failed form submission.
    fn show_aggregate_failure_notice(&mut self, message: &str);

    /// Disable (busy) or re-enable a control.
    fn set_busy(&mut self, control: &ControlRef, busy: bool);

    /// Toggle a region's loading indicator.
    fn set_loading(&mut self, region: &RegionRef, loading: bool);

    /// Full page navigation. Search navigations replace the history entry.
    fn navigate_to(&mut self, url: &Url);

    /// Blocking yes/no prompt.
    fn confirm(&mut self, message: &str) -> bool;

    /// Append a relative-time label to a timestamp element.
    fn annotate_timestamp(&mut self, target: &str, label: &str);
}
