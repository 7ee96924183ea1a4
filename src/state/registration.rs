//! Event registration submit gate.
//!
//! Registration and cancellation forms post straight to the server. Cancelling
//! asks for confirmation first; either way the submit control goes busy once the
//! post is allowed.

use crate::model::FormId;
use crate::presentation::{ControlRef, Presentation, RegionRef};
use tracing::{debug, info};

/// Prompt shown before a registration is cancelled.
pub const CANCEL_CONFIRMATION: &str =
    "Are you sure you want to cancel your registration for this event?";

/// What a registration form posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationAction {
    /// Sign up for an event.
    Register,
    /// Withdraw a registration; needs confirmation.
    Cancel,
}

impl RegistrationAction {
    /// Classify a form by its action URL. `None` for non-registration forms.
    pub fn classify(action_url: &str) -> Option<Self> {
        if action_url.contains("cancel_registration") {
            Some(Self::Cancel)
        } else if action_url.contains("register_event") {
            Some(Self::Register)
        } else {
            None
        }
    }
}

/// Submit gate for one registration form.
#[derive(Debug, Clone)]
pub struct RegistrationGate {
    form: FormId,
    action: RegistrationAction,
}

impl RegistrationGate {
    /// Bind to a form by its action URL. `None` if it is not a registration form.
    pub fn bind(form: FormId, action_url: &str) -> Option<Self> {
        let action = RegistrationAction::classify(action_url)?;
        debug!(form = %form, ?action, "registration form bound");
        Some(Self { form, action })
    }

    /// Gated form.
    pub fn form_id(&self) -> &FormId {
        &self.form
    }

    /// Register or cancel.
    pub fn action(&self) -> RegistrationAction {
        self.action
    }

    /// Returns whether the post should proceed.
    pub fn handle_submit<P: Presentation>(&self, p: &mut P) -> bool {
        if self.action == RegistrationAction::Cancel && !p.confirm(CANCEL_CONFIRMATION) {
            info!(form = %self.form, "registration cancel declined");
            return false;
        }

        p.set_loading(
            &RegionRef::SubmitContainer {
                form: self.form.clone(),
            },
            true,
        );
        p.set_busy(
            &ControlRef::SubmitButton {
                form: self.form.clone(),
            },
            true,
        );
        info!(form = %self.form, action = ?self.action, "registration submitted");
        true
    }
}
