//! Runtime configuration
//!
//! Values come from environment variables, falling back to defaults. The CLI
//! layers its own flags on top.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::majors::MajorList;

pub const ENV_API_URL: &str = "SIGNUP_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "SIGNUP_TIMEOUT_SECS";
pub const ENV_MAJORS_FILE: &str = "SIGNUP_MAJORS_FILE";

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where a configuration value was taken from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    #[default]
    Default,
    Env,
    Flag,
    /// Found at the platform config location
    Detected,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueSource::Default => "default",
            ValueSource::Env => "env",
            ValueSource::Flag => "flag",
            ValueSource::Detected => "detected",
        };
        write!(f, "{}", name)
    }
}

/// Source of each value in a [`Config`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sources {
    pub api_url: ValueSource,
    pub timeout_secs: ValueSource,
    pub majors_file: ValueSource,
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the judge API (`user/...` routes are appended)
    pub api_url: String,
    pub timeout_secs: u64,
    /// JSON array of majors; `None` means the built-in list
    pub majors_file: Option<PathBuf>,
    pub sources: Sources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            majors_file: None,
            sources: Sources::default(),
        }
    }
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
            config.sources.api_url = ValueSource::Env;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::config(format!("{} must be a number of seconds, got {:?}", ENV_TIMEOUT_SECS, raw))
            })?;
            config.sources.timeout_secs = ValueSource::Env;
        }

        if let Some(raw) = lookup(ENV_MAJORS_FILE).filter(|v| !v.trim().is_empty()) {
            config.majors_file = Some(expand_path(&raw)?);
            config.sources.majors_file = ValueSource::Env;
        } else if let Some(path) = default_majors_path().filter(|p| p.exists()) {
            config.majors_file = Some(path);
            config.sources.majors_file = ValueSource::Detected;
        }

        Ok(config)
    }

    /// Override the API URL (CLI flag)
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self.sources.api_url = ValueSource::Flag;
        self
    }

    /// Override the majors file (CLI flag); `~` and `$VARS` are expanded
    pub fn with_majors_file(mut self, raw: &str) -> Result<Self> {
        self.majors_file = Some(expand_path(raw)?);
        self.sources.majors_file = ValueSource::Flag;
        Ok(self)
    }

    /// The configured major list, or the built-in one
    pub fn majors(&self) -> Result<MajorList> {
        match &self.majors_file {
            Some(path) => MajorList::from_file(path),
            None => Ok(MajorList::default()),
        }
    }
}

/// Expand `~` and environment variables in a path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| Error::config(format!("Cannot expand path {:?}: {}", raw, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// `<config dir>/signup/majors.json`
pub fn default_majors_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("signup").join("majors.json"))
}
