//! Recording test double for [`Presentation`].

use super::{ControlRef, FieldRef, Presentation, RegionRef};
use serde::Serialize;
use std::collections::VecDeque;
use url::Url;

/// One recorded presentation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// [`Presentation::show_field_error`].
    ShowFieldError {
        /// Target field.
        field: FieldRef,
        /// Inline message.
        message: String,
    },
    /// [`Presentation::clear_field_error`].
    ClearFieldError {
        /// Target field.
        field: FieldRef,
    },
    /// [`Presentation::show_aggregate_failure_notice`].
    AggregateFailureNotice {
        /// Notice text.
        message: String,
    },
    /// [`Presentation::set_busy`].
    SetBusy {
        /// Target control.
        control: ControlRef,
        /// New busy state.
        busy: bool,
    },
    /// [`Presentation::set_loading`].
    SetLoading {
        /// Target region.
        region: RegionRef,
        /// New loading state.
        loading: bool,
    },
    /// [`Presentation::navigate_to`].
    NavigateTo {
        /// Destination URL.
        url: String,
    },
    /// [`Presentation::confirm`], with the scripted answer.
    Confirm {
        /// Prompt text.
        message: String,
        /// Answer returned to the core.
        accepted: bool,
    },
    /// [`Presentation::annotate_timestamp`].
    AnnotateTimestamp {
        /// Element identifier.
        target: String,
        /// Relative-time label.
        label: String,
    },
}

/// Records every call in order. `confirm` answers come from a scripted queue
/// and default to `true` once the queue runs dry.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    effects: Vec<Effect>,
    confirm_answers: VecDeque<bool>,
}

impl RecordingPresentation {
    /// Empty recorder; every `confirm` answers `true`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answers returned by successive `confirm` calls.
    pub fn with_confirm_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            effects: Vec::new(),
            confirm_answers: answers.into_iter().collect(),
        }
    }

    /// Everything recorded since the last drain.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Drain everything recorded so far.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Message currently displayed for `field`, replaying show/clear calls.
    pub fn field_error(&self, field: &FieldRef) -> Option<&str> {
        self.effects.iter().fold(None, |current, effect| match effect {
            Effect::ShowFieldError { field: f, message } if f == field => Some(message.as_str()),
            Effect::ClearFieldError { field: f } if f == field => None,
            _ => current,
        })
    }

    /// Last busy state set on `control` (false if never touched).
    pub fn is_busy(&self, control: &ControlRef) -> bool {
        self.effects
            .iter()
            .rev()
            .find_map(|effect| match effect {
                Effect::SetBusy { control: c, busy } if c == control => Some(*busy),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Last loading state set on `region` (false if never touched).
    pub fn is_loading(&self, region: &RegionRef) -> bool {
        self.effects
            .iter()
            .rev()
            .find_map(|effect| match effect {
                Effect::SetLoading { region: r, loading } if r == region => Some(*loading),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// URLs navigated to, in order.
    pub fn navigations(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::NavigateTo { url } => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Aggregate failure notices shown, in order.
    pub fn notices(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::AggregateFailureNotice { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Presentation for RecordingPresentation {
    fn show_field_error(&mut self, field: &FieldRef, message: &str) {
        self.effects.push(Effect::ShowFieldError {
            field: field.clone(),
            message: message.to_string(),
        });
    }

    fn clear_field_error(&mut self, field: &FieldRef) {
        self.effects.push(Effect::ClearFieldError {
            field: field.clone(),
        });
    }

    fn show_aggregate_failure_notice(&mut self, message: &str) {
        self.effects.push(Effect::AggregateFailureNotice {
            message: message.to_string(),
        });
    }

    fn set_busy(&mut self, control: &ControlRef, busy: bool) {
        self.effects.push(Effect::SetBusy {
            control: control.clone(),
            busy,
        });
    }

    fn set_loading(&mut self, region: &RegionRef, loading: bool) {
        self.effects.push(Effect::SetLoading {
            region: region.clone(),
            loading,
        });
    }

    fn navigate_to(&mut self, url: &Url) {
        self.effects.push(Effect::NavigateTo {
            url: url.to_string(),
        });
    }

    fn confirm(&mut self, message: &str) -> bool {
        let accepted = self.confirm_answers.pop_front().unwrap_or(true);
        self.effects.push(Effect::Confirm {
            message: message.to_string(),
            accepted,
        });
        accepted
    }

    fn annotate_timestamp(&mut self, target: &str, label: &str) {
        self.effects.push(Effect::AnnotateTimestamp {
            target: target.to_string(),
            label: label.to_string(),
        });
    }
}
