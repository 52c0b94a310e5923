//! Response envelope: success/error interpretation of raw API responses.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClodoError, Result};

/// Error code the API puts in the body when credentials are rejected.
const INVALID_CREDENTIALS_CODE: i64 = 401;

/// A fully read API response.
#[derive(Debug, Clone)]
pub struct ClodoResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ClodoResponse {
    /// Build an envelope from already-read parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Read the body of a `reqwest` response and wrap it.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Self::new(status, headers, body))
    }

    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the request succeeded.
    ///
    /// 200, 201 and 202 are the ordinary success codes. 204 is accepted as well,
    /// since mutation endpoints answer with an empty `No Content` body.
    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED
        ) || self.is_no_content()
    }

    /// Whether the status is exactly 204. Boolean mutations report this.
    pub fn is_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Deserialize the body into a per-endpoint structure.
    pub fn object<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(ClodoError::from)
    }

    /// Interpret an error response.
    ///
    /// A body of the form `{"code": 401, "details": ...}` becomes
    /// [`ClodoError::InvalidCredentials`]. Anything else is returned as
    /// [`ClodoError::Api`] with the decoded body unchanged.
    pub fn parse_error(&self) -> ClodoError {
        let body = serde_json::from_str::<Value>(&self.body)
            .unwrap_or_else(|_| Value::String(self.body.clone()));

        if body.get("code").and_then(Value::as_i64) == Some(INVALID_CREDENTIALS_CODE) {
            let details = body
                .get("details")
                .or_else(|| body.get("message"))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            return ClodoError::InvalidCredentials(details);
        }

        // TODO: classify rate limiting and service-unavailable bodies once the
        // API documents their error codes.
        ClodoError::Api {
            status: self.status.as_u16(),
            body,
        }
    }
}
