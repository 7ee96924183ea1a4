//! Domain model types (pure).
//!
//! All types in this module are plain owned data with smart constructors. DOM reads
//! and writes happen elsewhere, at the edges.

pub mod error;
pub mod field;
pub mod form;
pub mod identifiers;
pub mod query;
pub mod relative_time;

// Re-export for convenience
pub use error::{AppError, BindingError, LocationError, ScenarioError};
pub use field::{FieldDescriptor, FieldError, FieldKind};
pub use form::{FormState, PASSWORD_FIELD};
pub use identifiers::{FieldName, FormId, InvalidFieldName, InvalidFormId};
pub use query::QueryState;
pub use relative_time::format_relative_time;
