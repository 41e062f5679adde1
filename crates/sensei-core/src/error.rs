//! Error types for the Sensei conversation pipeline.

use thiserror::Error;

/// A shared error type for the whole pipeline.
///
/// Each variant maps to one class of the failure taxonomy: configuration
/// problems are fatal at startup, transport problems are retryable unless
/// they are cancellations, authorization failures are never retried, and
/// upstream provider failures carry an explicit retryability hint.
#[derive(Error, Debug, Clone)]
pub enum SenseiError {
    /// Missing or invalid process configuration (e.g. no API credential).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-level failure (connect, timeout, broken stream).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// Upstream rejected the credential (401/403).
    #[error("Authorization error ({status}): {message}")]
    Authorization { status: u16, message: String },

    /// Application-level failure reported by the model provider.
    #[error("Upstream error: {message}")]
    Upstream { message: String, retryable: bool },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SenseiError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an Authorization error
    pub fn authorization(status: u16, message: impl Into<String>) -> Self {
        Self::Authorization {
            status,
            message: message.into(),
        }
    }

    /// Creates an Upstream error with an explicit retryability hint
    pub fn upstream(message: impl Into<String>, retryable: bool) -> Self {
        Self::Upstream {
            message: message.into(),
            retryable,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether a retry may succeed.
    ///
    /// Cancellations, authorization failures, and configuration errors are
    /// never retryable; upstream errors carry their own hint.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Upstream { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Check if this is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this is an authorization failure
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<serde_json::Error> for SenseiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SenseiError {
    fn from(err: reqwest::Error) -> Self {
        // Connect and timeout failures are transient; so is a stream that
        // dies mid-body. Status-code mapping happens at the call site where
        // the response body is still available.
        Self::Transport {
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SenseiError>`.
pub type Result<T> = std::result::Result<T, SenseiError>;
