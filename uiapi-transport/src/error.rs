//! Transport error types.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single request/response exchange with the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-success HTTP status.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
        /// Retry-After header value.
        retry_after: Option<Duration>,
    },

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The server could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a body that is not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TransportError {
    /// Create an HTTP error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Get the suggested retry-after duration.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether the failure is transient and the request may be repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Timeout | Self::Connection(_) => true,
            Self::InvalidResponse(_) | Self::Serialization(_) | Self::Other(_) => false,
        }
    }

    /// Get the HTTP status if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else if err.is_decode() {
            TransportError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            TransportError::http(status.as_u16(), err.to_string())
        } else {
            TransportError::Other(err.into())
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::timeout(TransportError::Timeout, true)]
    #[case::connection(TransportError::connection("refused"), true)]
    #[case::server_error(TransportError::http(500, "error"), true)]
    #[case::rate_limited(TransportError::http(429, "slow down"), true)]
    #[case::bad_request(TransportError::http(400, "bad request"), false)]
    #[case::invalid_body(TransportError::invalid_response("not json"), false)]
    fn test_retryable_errors(#[case] error: TransportError, #[case] retryable: bool) {
        assert_eq!(error.is_retryable(), retryable);
    }

    #[test]
    fn test_retry_after() {
        let err = TransportError::Http {
            status: 503,
            body: String::new(),
            retry_after: Some(Duration::from_secs(5)),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
        assert_eq!(TransportError::Timeout.retry_after(), None);
    }

    #[test]
    fn test_status() {
        assert_eq!(TransportError::http(503, "unavailable").status(), Some(503));
        assert_eq!(TransportError::Timeout.status(), None);
    }

    #[test]
    fn test_display() {
        let err = TransportError::http(404, "Not found");
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Not found"));
    }
}
