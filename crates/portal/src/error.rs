//! Unified error handling for the portal.
//!
//! Every failure ends up in front of a person as a single line of text, so
//! the error type carries enough to pick that line: the server's own message
//! when it sent one, a caller-supplied fallback otherwise.

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Shown when the request never got an HTTP response.
pub const UNREACHABLE_MESSAGE: &str = "Cannot reach the server. Check your connection and try again.";

/// Shown when an operation needs a session and there is none.
pub const SIGNED_OUT_MESSAGE: &str = "Your session has ended. Please log in again.";

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The request could not be sent or no response arrived.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a failure and a JSON body.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The backend answered without a parseable JSON body.
    #[error("Invalid response (HTTP {status})")]
    InvalidResponse { status: u16 },

    /// The JSON body did not have the expected shape.
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// Input rejected before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The operation needs a session token and none is stored.
    #[error("Not signed in")]
    SignedOut,

    /// Durable session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PortalError {
    /// Build a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The line to show the user.
    ///
    /// Server-supplied messages are passed through verbatim. `fallback` is
    /// used when the server failed without saying why.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Network(_) => UNREACHABLE_MESSAGE.to_string(),
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::SignedOut => SIGNED_OUT_MESSAGE.to_string(),
            Self::Api { .. }
            | Self::InvalidResponse { .. }
            | Self::Decode(_)
            | Self::Storage(_)
            | Self::Config(_) => fallback.to_string(),
        }
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::InvalidResponse { status } => Some(*status),
            _ => None,
        }
    }
}

/// A failed user flow: the line to show plus the underlying cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FlowError {
    /// User-facing text.
    pub message: String,
    #[source]
    pub cause: PortalError,
}

impl FlowError {
    /// Wrap `cause`, choosing the message with [`PortalError::user_message`].
    #[must_use]
    pub fn new(cause: PortalError, fallback: &str) -> Self {
        Self {
            message: cause.user_message(fallback),
            cause,
        }
    }

    /// A client-side rejection made before any request.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            cause: PortalError::Validation(message.clone()),
            message,
        }
    }
}
