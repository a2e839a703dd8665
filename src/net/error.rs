//! Normalized failure type for every REST call.
//!
//! ERROR HANDLING
//! ==============
//! The transport and pipeline only ever reject with an [`ApiError`], so the
//! session and store boundaries can match exhaustively and turn failures
//! into display text without inspecting raw payloads.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::net::types::ErrorBody;
use crate::util::storage::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// No usable response: the request never completed or the body was unreadable.
    #[error("network failure")]
    Network { message: Option<String> },
    /// Server rejected the credentials (401/403).
    #[error("authentication failed ({status})")]
    Auth { status: u16, message: Option<String> },
    /// Server rejected the request for any other non-2xx reason.
    #[error("request rejected ({status})")]
    Validation { status: u16, message: Option<String> },
    /// Persisted credential storage could not be read or written.
    #[error("credential storage unavailable")]
    Storage { message: Option<String> },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: Some(message.into()) }
    }

    /// Classify a non-2xx response, pulling `message` out of a JSON error body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = error_message_from_body(body);
        match status {
            401 | 403 => Self::Auth { status, message },
            _ => Self::Validation { status, message },
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Validation { status, .. } => Some(*status),
            Self::Network { .. } | Self::Storage { .. } => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Network { message }
            | Self::Auth { message, .. }
            | Self::Validation { message, .. }
            | Self::Storage { message } => message.as_deref(),
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Text to show the user: the server's own message when it sent one,
    /// otherwise `default`.
    #[must_use]
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Auth { message: Some(m), .. } | Self::Validation { message: Some(m), .. } => m.clone(),
            Self::Auth { .. } | Self::Validation { .. } | Self::Network { .. } | Self::Storage { .. } => {
                default.to_owned()
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage { message: Some(err.to_string()) }
    }
}

fn error_message_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.message.filter(|m| !m.trim().is_empty())
}
