//! # signup-core
//!
//! Sign-up registration logic for the online judge, independent of any UI.
//!
//! This crate provides:
//! - Form field models and the registration payload (`models` module)
//! - Field validation rules (`validation` module)
//! - The form controller: focus, username checks, guarded submit (`form` module)
//! - The error-display policy (`display` module)
//! - Major list and picker (`majors` module)
//! - User directory client (`directory` module)
//! - Runtime configuration (`config` module)
//! - Unified error handling (`error` module)

pub mod config;
pub mod directory;
pub mod display;
pub mod error;
pub mod form;
pub mod majors;
pub mod models;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use directory::{HttpUserDirectory, UserDirectory};
pub use error::{Error, Result};
pub use form::{FormEvent, Notification, NotificationLevel, SignUpForm, SubmitBlocker, SubmitOutcome};
pub use majors::{MajorList, MajorPicker};
pub use models::{
    Availability, Field, FieldError, FormValues, RegisterPayload, SignUpContext, UsernameCheck,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
