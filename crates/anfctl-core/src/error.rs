//! Unified error handling for anfctl-core
//!
//! Every fallible operation in the crate returns [`CoreError`]. The poller
//! relies on [`CoreError::is_not_found`] to tell the expected "not there yet"
//! signal apart from errors that must abort a wait.
//!
//! # Example
//!
//! ```rust
//! use anfctl_core::CoreError;
//!
//! let err = CoreError::not_found("volume anftestvolume");
//! assert!(err.is_not_found());
//! assert!(!err.is_wait_failure());
//! ```

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// The requested resource does not exist (404)
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Authentication or authorization was rejected (401/403)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Management API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A wait exhausted its attempt budget
    #[error("Timed out waiting for {resource} after {attempts} attempts")]
    WaitTimedOut { resource: String, attempts: u32 },

    /// Cancelled before a request was sent or while waiting on it
    #[error("Operation on {resource} was cancelled")]
    WaitCancelled { resource: String },

    /// Invalid input (resource ids, sizes, names)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Build a [`CoreError::NotFound`] for the given resource description
    pub fn not_found(resource: impl Into<String>) -> Self {
        CoreError::NotFound {
            resource: resource.into(),
        }
    }

    /// Map an HTTP status and body to the matching error variant
    pub fn from_status(status: u16, resource: &str, message: impl Into<String>) -> Self {
        match status {
            404 => CoreError::not_found(resource),
            401 | 403 => CoreError::Unauthorized {
                status,
                message: message.into(),
            },
            _ => CoreError::Api {
                status,
                message: message.into(),
            },
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Unauthorized { .. })
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self {
            CoreError::Api { status, .. } => (500..600).contains(status),
            CoreError::Http(e) => e.status().is_some_and(|s| s.is_server_error()),
            _ => false,
        }
    }

    /// Returns true if a wait ran out of attempts
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::WaitTimedOut { .. } => true,
            CoreError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns true if the operation was cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::WaitCancelled { .. })
    }

    /// Returns true if this error means "the wait failed"
    ///
    /// Callers treat an exhausted budget and a fatal fetch error the same way;
    /// only the diagnostic differs. Not-found and cancellation are excluded.
    #[must_use]
    pub fn is_wait_failure(&self) -> bool {
        !self.is_not_found() && !self.is_cancelled()
    }
}
