//! # API Errors
//!
//! Error types for calls to the remote exchange backend.
//!
//! # Examples
//!
//! ```
//! use echange_core::infrastructure::api::error::ApiError;
//!
//! let error = ApiError::timeout("request timed out after 5000ms");
//! assert_eq!(error.status(), None);
//!
//! let error = ApiError::http(422, "Titre trop court");
//! assert_eq!(error.status(), Some(422));
//! assert_eq!(error.message(), "Titre trop court");
//! ```

use crate::domain::errors::DomainError;
use thiserror::Error;

/// Error type for backend API calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server `message`, or the raw body when there is none.
        message: String,
    },

    /// The resource does not exist, or the response carried no entity.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Network or connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Authentication or authorization failure.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Client-side failure unrelated to the server.
    #[error("internal error: {0}")]
    Internal(String),

    /// Input rejected locally before any request was sent.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    /// Creates an HTTP status error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the HTTP status for status errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the request was rejected before being sent.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Message suitable for display, without the error class prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. }
            | Self::NotFound(message)
            | Self::Timeout(message)
            | Self::Connection(message)
            | Self::Decode(message)
            | Self::Unauthorized(message)
            | Self::Internal(message) => message.clone(),
            Self::Domain(err) => err.to_string(),
        }
    }
}

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
