//! Identifier newtypes with smart constructors.
//!
//! Identifiers reject empty (or whitespace-only) strings at construction time.
//! The raw constructors are private; use `new` or deserialize.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an input within one form. Unique per form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    /// Smart constructor: rejects empty and whitespace-only names.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidFieldName> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Err(InvalidFieldName::Empty)
        } else {
            Ok(Self(raw))
        }
    }

    /// The raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FieldName {
    type Error = InvalidFieldName;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<FieldName> for String {
    fn from(name: FieldName) -> Self {
        name.0
    }
}

/// Identifier of a bound form (its DOM id or selector).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormId(String);

impl FormId {
    /// Smart constructor: rejects empty and whitespace-only ids.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidFormId> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Err(InvalidFormId::Empty)
        } else {
            Ok(Self(raw))
        }
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FormId {
    type Error = InvalidFormId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<FormId> for String {
    fn from(id: FormId) -> Self {
        id.0
    }
}

// ===== Error Types =====

/// Rejected field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFieldName {
    /// Blank name.
    #[error("Field name cannot be empty")]
    Empty,
}

/// Rejected form id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFormId {
    /// Blank id.
    #[error("Form id cannot be empty")]
    Empty,
}

// ===== Tests =====
