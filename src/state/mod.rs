//! Interaction components (pure).
//!
//! Each component owns its state exclusively and reaches the page only through
//! the [`Presentation`](crate::presentation::Presentation) capability passed into
//! every operation.

pub mod location;
pub mod registration;
pub mod search_sync;
pub mod validation;

// Re-export for convenience
pub use location::{Location, CATEGORY_PARAM, PAGE_PARAM, SEARCH_PARAM};
pub use registration::{RegistrationAction, RegistrationGate, CANCEL_CONFIRMATION};
pub use search_sync::{
    SearchStateSynchronizer, SyncPhase, DEFAULT_DEBOUNCE, DEFAULT_NAVIGATION_DELAY,
};
pub use validation::{
    evaluate, ValidationEngine, ValidationRules, DEFAULT_MIN_PASSWORD_LENGTH,
    DEFAULT_SUBMIT_FALLBACK, FAILURE_NOTICE,
};
