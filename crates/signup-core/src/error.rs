//! Unified error handling for signup-core

use thiserror::Error;

/// Core error type for signup-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for signup-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// True for 4xx responses, which the directory uses to report a taken
    /// or malformed username.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Rejected { status } => (400..500).contains(status),
            Error::Http(e) => e.status().is_some_and(|s| s.is_client_error()),
            _ => false,
        }
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing api url");
        assert_eq!(err.to_string(), "Configuration error: missing api url");
    }

    #[test]
    fn test_error_conversion_to_string() {
        let err = Error::validation("Invalid input");
        let s: String = err.into();
        assert!(s.contains("Validation error"));
    }

    #[test]
    fn test_is_client_error() {
        assert!(Error::Rejected { status: 409 }.is_client_error());
        assert!(Error::Rejected { status: 400 }.is_client_error());
        assert!(!Error::Rejected { status: 500 }.is_client_error());
        assert!(!Error::internal("boom").is_client_error());
    }
}
