//! Client engine for browsing and recommending university elective
//! modules ("VKM"s, vrije keuzemodules).
//!
//! This crate is the logic layer behind a student-facing front end. It
//! talks to an external backend over HTTP and keeps no business logic of
//! its own beyond client-side filtering, facet derivation, the
//! recommendation wizard state machine, and tag suggestion. Rendering is
//! a consumer concern; everything here is UI-framework agnostic.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod locale;
pub mod session;
pub mod wizard;

pub use config::ApiConfig;
pub use error::VkmError;
pub use locale::{Language, Theme};
pub use session::SessionStore;
