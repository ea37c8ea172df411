//! Client error types.

use thiserror::Error;

/// Message carried by [`Error::Unauthorized`] when the server rejects the session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";

/// Fallback message for failed JSON requests without a readable error body.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// Fallback message for failed uploads without a readable error body.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered 401 on an authenticated endpoint.
    ///
    /// The stored token has already been cleared and the logout event emitted.
    #[error("{message}")]
    Unauthorized {
        /// Always [`SESSION_EXPIRED_MESSAGE`].
        message: String,
    },

    /// The server answered with any other non-success status.
    #[error("{message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Server-provided `error` field, or the call site's fallback.
        message: String,
    },

    /// Transport-level failure (DNS, connection reset, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An endpoint was invoked with arguments it cannot accept.
    #[error("Invalid call to {endpoint}: {reason}")]
    InvalidCall {
        /// Endpoint key, e.g. `applications.get`.
        endpoint: String,
        /// What was wrong with the call.
        reason: String,
    },

    /// Token storage could not be read or written.
    #[error("Session storage error: {0}")]
    Session(String),

    /// Reading an upload source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn unauthorized() -> Self {
        Error::Unauthorized {
            message: SESSION_EXPIRED_MESSAGE.to_string(),
        }
    }

    pub(crate) fn invalid_call(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidCall {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Check if the session was rejected by the server.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// HTTP status of a server-side failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::RequestFailed { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RequestFailed { status: 404, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::RequestFailed { status, .. } if *status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the backend.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    /// Pull the `error` field out of a raw body, if it parses.
    pub(crate) fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorResponse>(body)
            .ok()
            .map(|e| e.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json_body() {
        let msg = ErrorResponse::message_from(br#"{"error":"Lead not found"}"#);
        assert_eq!(msg.as_deref(), Some("Lead not found"));
    }

    #[test]
    fn test_error_message_from_garbage() {
        assert!(ErrorResponse::message_from(b"<html>502</html>").is_none());
        assert!(ErrorResponse::message_from(br#"{"message":"nope"}"#).is_none());
        assert!(ErrorResponse::message_from(b"").is_none());
    }

    #[test]
    fn test_unauthorized_display() {
        let err = Error::unauthorized();
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn test_status_helpers() {
        let err = Error::RequestFailed {
            status: 404,
            message: "Not here".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_server_error());
        assert_eq!(err.to_string(), "Not here");

        let err = Error::RequestFailed {
            status: 503,
            message: REQUEST_FAILED_MESSAGE.to_string(),
        };
        assert!(err.is_server_error());
    }
}
