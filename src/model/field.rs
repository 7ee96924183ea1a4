//! Field descriptors and field-level errors.

use super::identifiers::FieldName;
use serde::{Deserialize, Serialize};

// ===== FieldKind =====

/// Which rule set applies to an input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain text; only `required` applies.
    #[default]
    Text,
    /// Email address format.
    Email,
    /// Password with a minimum length.
    Password,
    /// Must equal the form's `password` sibling.
    PasswordConfirm,
    /// Any other input type; only `required` applies.
    Other,
}

impl FieldKind {
    /// Whether this kind carries a format rule beyond `required`.
    ///
    /// Such fields are checked on form validation even when not required.
    pub fn has_format_rule(self) -> bool {
        matches!(
            self,
            FieldKind::Email | FieldKind::Password | FieldKind::PasswordConfirm
        )
    }
}

// ===== FieldError =====

/// A user-correctable validation failure on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FieldError {
    /// Empty (after trimming) and required.
    #[error("This field is required")]
    Required,

    /// Not shaped like `local@domain.tld`.
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// Password shorter than the configured minimum.
    #[error("Password must be at least {min} characters long")]
    TooShort {
        /// Configured minimum length.
        min: usize,
    },

    /// Confirmation differs from the password.
    #[error("Passwords do not match")]
    Mismatch,
}

impl FieldError {
    /// Stable short code for logs and tests.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::Required => "required",
            FieldError::InvalidEmail => "invalid email",
            FieldError::TooShort { .. } => "too short",
            FieldError::Mismatch => "mismatch",
        }
    }
}

// ===== FieldDescriptor =====

/// One input under validation.
///
/// The raw value is kept as typed; rules always evaluate the trimmed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: FieldName,
    value: String,
    required: bool,
    kind: FieldKind,
    error: Option<FieldError>,
}

impl FieldDescriptor {
    /// Optional, empty field of the given kind.
    pub fn new(name: FieldName, kind: FieldKind) -> Self {
        Self {
            name,
            value: String::new(),
            required: false,
            kind,
            error: None,
        }
    }

    /// Builder: mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder: set the initial (server-rendered) value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Field name, unique within its form.
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Raw value as typed.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value rules are evaluated against.
    pub fn trimmed_value(&self) -> &str {
        self.value.trim()
    }

    /// Whether an empty value is an error.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Which rules apply.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Error from the latest check, if any.
    pub fn error(&self) -> Option<FieldError> {
        self.error
    }

    /// No error recorded.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Whether form-level validation should look at this field.
    pub fn is_checked_on_submit(&self) -> bool {
        self.required || self.kind.has_format_rule()
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }

    pub(crate) fn set_error(&mut self, error: Option<FieldError>) {
        self.error = error;
    }
}
