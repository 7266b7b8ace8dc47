//! Error types for the OSSign client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the signing service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(reqwest::Error),

    /// The call exceeded its per-request timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The service could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    /// API returned an error status code
    #[error("{status} {status_text} - {body}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        status_text: String,
        /// Response body, truncated
        body: String,
    },

    /// API answered with a success status but an error envelope
    #[error("{message}")]
    Remote {
        /// `message` field of the envelope
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client could not be configured
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Longest response body kept in an [`ClientError::ApiError`]
const BODY_EXCERPT_CHARS: usize = 1024;

impl ClientError {
    /// Create an API error from a status code and the response body
    pub fn api_error(status: u16, status_text: impl Into<String>, body: impl AsRef<str>) -> Self {
        Self::ApiError {
            status,
            status_text: status_text.into(),
            body: excerpt(body.as_ref()),
        }
    }

    /// Whether a later attempt of the same call may succeed.
    ///
    /// Only per-call timeouts and connection failures qualify. Error statuses
    /// and error envelopes are answers from the service and are never retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::RequestFailed(err)
        }
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::api_error(401, "Unauthorized", "bad token\n");
        assert_eq!(err.to_string(), "401 Unauthorized - bad token");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x".repeat(BODY_EXCERPT_CHARS + 50);
        match ClientError::api_error(502, "Bad Gateway", &body) {
            ClientError::ApiError { body, .. } => {
                assert_eq!(body.len(), BODY_EXCERPT_CHARS + 3);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(ClientError::Timeout("60s elapsed".into()).is_transient());
        assert!(ClientError::Connection("refused".into()).is_transient());
        assert!(
            !ClientError::Remote {
                message: "workflow not found".into()
            }
            .is_transient()
        );
        assert!(!ClientError::ParseError("eof".into()).is_transient());
    }
}
