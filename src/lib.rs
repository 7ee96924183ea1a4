//! Festagram UI interaction core
//!
//! Headless model of the client-side behavior of Festagram pages: field and form
//! validation with submit gating, debounced search synchronized into the page
//! location, and registration confirmation.
//!
//! Pure Core / Impure Shell: components in [`state`] own their state and reach the
//! page only through the [`presentation::Presentation`] capability. Time is the
//! virtual [`schedule::PageTime`] clock, advanced by [`page::PageRuntime`].

pub mod config;
pub mod logging;
pub mod model;
pub mod page;
pub mod presentation;
pub mod schedule;
pub mod state;
