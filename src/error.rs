//! Error types for Clodo API operations.

use thiserror::Error;

/// Errors that can occur when talking to the Clodo API.
#[derive(Debug, Error)]
pub enum ClodoError {
    /// The provider rejected the credentials (error body with `code == 401`).
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Any other non-success response, carrying the decoded error body.
    #[error("api error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Decoded error body, or the raw text as a JSON string.
        body: serde_json::Value,
    },

    /// A header required by the authentication handshake was absent.
    #[error("missing response header: {0}")]
    MissingHeader(&'static str),

    /// A header was present but not valid visible ASCII.
    #[error("invalid header value: {0}")]
    InvalidHeader(&'static str),

    /// JSON deserialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClodoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClodoError::InvalidCredentials("bad key".to_string()).to_string(),
            "invalid credentials: bad key"
        );
        assert_eq!(
            ClodoError::MissingHeader("X-Auth-Token").to_string(),
            "missing response header: X-Auth-Token"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ClodoError::Api {
            status: 500,
            body: serde_json::json!({"code": 500, "message": "Internal"}),
        };
        let text = err.to_string();
        assert!(text.starts_with("api error 500: "));
        assert!(text.contains("Internal"));
    }
}
