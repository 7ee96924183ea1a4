//! Form state: ordered fields plus the submission flag.

use super::error::BindingError;
use super::field::FieldDescriptor;
use super::identifiers::{FieldName, FormId};
use std::collections::HashSet;

/// Name of the sibling a confirmation field is compared against.
pub const PASSWORD_FIELD: &str = "password";

/// One bound form. Fields are kept in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    id: FormId,
    fields: Vec<FieldDescriptor>,
    is_submitting: bool,
}

impl FormState {
    /// Build a form, rejecting duplicate field names.
    pub fn new(id: FormId, fields: Vec<FieldDescriptor>) -> Result<Self, BindingError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(BindingError::DuplicateField {
                    form: id,
                    field: field.name().clone(),
                });
            }
        }

        Ok(Self {
            id,
            fields,
            is_submitting: false,
        })
    }

    /// Form identifier.
    pub fn id(&self) -> &FormId {
        &self.id
    }

    /// Fields in document order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field by name.
    pub fn field(&self, name: &FieldName) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Document-order index of a field.
    pub fn position(&self, name: &FieldName) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Live raw value of the `password` sibling, if the form has one.
    ///
    /// Not trimmed: a confirmation matches only a password typed without
    /// surrounding whitespace.
    pub fn password_value(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name().as_str() == PASSWORD_FIELD)
            .map(FieldDescriptor::value)
    }

    pub(crate) fn field_at_mut(&mut self, index: usize) -> Option<&mut FieldDescriptor> {
        self.fields.get_mut(index)
    }

    /// Enter the submitting state. Returns false (and changes nothing) if a
    /// submission is already in progress.
    pub(crate) fn begin_submit(&mut self) -> bool {
        if self.is_submitting {
            return false;
        }
        self.is_submitting = true;
        true
    }

    pub(crate) fn end_submit(&mut self) {
        self.is_submitting = false;
    }
}
