//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod check;
pub mod config;
pub mod majors;
pub mod register;
pub mod validate;

use crate::output::OutputFormat;
use signup_core::Config;

/// Shared context for all commands
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub quiet: bool,
}
