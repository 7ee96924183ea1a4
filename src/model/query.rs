//! Canonical search query.

use serde::Serialize;

/// The single authoritative search representation: free-text term plus
/// category filter.
///
/// Built from both control values at once; never patched field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct QueryState {
    term: Option<String>,
    category: Option<String>,
}

impl QueryState {
    /// Build from the raw control values.
    ///
    /// The term is trimmed; an empty term or category becomes absent.
    pub fn from_controls(term: &str, category: &str) -> Self {
        let term = term.trim();
        Self {
            term: (!term.is_empty()).then(|| term.to_string()),
            category: (!category.is_empty()).then(|| category.to_string()),
        }
    }

    /// Trimmed search term, if any.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Selected category, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// No term and no category.
    pub fn is_empty(&self) -> bool {
        self.term.is_none() && self.category.is_none()
    }
}
