//! Error types for the interaction core and its shell.
//!
//! Errors are split by who can fix them:
//!
//! - [`FieldError`](super::FieldError) - user-correctable field content. Never an `Err`;
//!   it lives in the field's error state and is rendered inline.
//! - [`BindingError`] - programmer/configuration errors detected when a form is bound.
//!   Reported once, never resurfaced per keystroke.
//! - [`LocationError`] - the page location string could not be parsed as an absolute URL.
//! - [`ScenarioError`] - a replay scenario could not be read or built.
//! - [`AppError`] - top-level shell error for the replay binary.
//!
//! # Recovery Strategy
//!
//! Nothing raised during routine input handling propagates out of the core. Validation
//! failures become inline feedback; configuration problems are logged once at bind time
//! and the affected rule degrades to "pass". Only the shell (config load, scenario
//! parsing, logging setup) returns `Err`, composing via `?` and `From`.

use super::identifiers::{FieldName, FormId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the replay binary.
///
/// Every shell-side failure converts into `AppError` via `From`, so `main` can use `?`
/// throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Scenario file could not be loaded or bound.
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// Tracing subscriber could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Writing replay output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing a replay record failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Configuration errors detected while binding a form.
///
/// `DuplicateField` is fatal for the binding: field names are lookup keys, so a form
/// with two fields of the same name cannot be validated deterministically. The other
/// variants are soft: the binding succeeds, the problem is logged once, and the
/// affected behavior degrades to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Two fields in one form share a name.
    #[error("form {form} declares field {field} more than once")]
    DuplicateField {
        /// Form being bound.
        form: FormId,
        /// The repeated name.
        field: FieldName,
    },

    /// A confirmation field has no sibling named `password` to compare against.
    ///
    /// The confirm rule is skipped for this field; everything else still validates.
    #[error("confirmation field {field} in form {form} has no sibling named \"password\"")]
    MissingPasswordSibling {
        /// Form being bound.
        form: FormId,
        /// The orphaned confirmation field.
        field: FieldName,
    },

    /// An event named a field the form does not contain.
    #[error("form {form} has no field named {field}")]
    UnknownField {
        /// Form that received the event.
        form: FormId,
        /// Name carried by the event.
        field: FieldName,
    },

    /// An event named a form the page has not bound.
    #[error("no form named {form} is bound on this page")]
    UnknownForm {
        /// Form named by the event.
        form: FormId,
    },

    /// A search event arrived on a page without search controls.
    #[error("page has no search controls")]
    MissingSearchControls,
}

/// The page location could not be used as a navigable URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The string is not an absolute URL.
    #[error("invalid page location {input:?}: {reason}")]
    Invalid {
        /// The rejected location string.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },
}

/// Errors loading or binding a replay scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("Failed to read scenario at {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The scenario is not valid JSON for the expected shape.
    #[error("Invalid scenario JSON in {path}: {source}")]
    Parse {
        /// Path with invalid content.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_json::Error,
    },

    /// The initial location is unusable.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// A form could not be bound.
    #[error(transparent)]
    Binding(#[from] BindingError),
}
