//! Credentials and the token issued by the authentication handshake.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ClodoError, Result};
use crate::response::ClodoResponse;

/// Request header carrying the account user id (handshake only).
pub const AUTH_USER_HEADER: &str = "X-Auth-User";

/// Request header carrying the account API key (handshake only).
pub const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// Token header: returned by the handshake, sent on every later request.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Handshake response header with the token issue time.
pub const TOKEN_ISSUED_HEADER: &str = "X-Auth-Token-Issued";

/// Handshake response header with the token expiry time.
pub const TOKEN_EXPIRED_HEADER: &str = "X-Auth-Token-Expired";

/// Optional handshake response header naming the API endpoint to use.
pub const MANAGEMENT_URL_HEADER: &str = "X-Server-Management-Url";

/// Account credentials. The key is never printed or logged.
#[derive(Debug)]
pub struct Credentials {
    user_id: String,
    key: SecretString,
}

impl Credentials {
    /// Create credentials from a user id and API key.
    pub fn new(user_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            key: SecretString::from(key.into()),
        }
    }

    /// The account user id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub(crate) fn key(&self) -> &str {
        self.key.expose_secret()
    }
}

/// Token state returned by a successful handshake.
///
/// Timestamps are kept verbatim in the provider's format
/// (e.g. `2022-05-02T16:38:15+0300`). The token is never refreshed: once it
/// expires every call fails and a new connection has to be made.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    issued: String,
    expires: String,
    management_url: Option<String>,
}

impl Session {
    /// Extract the session from the handshake response headers.
    pub fn from_response(response: &ClodoResponse) -> Result<Self> {
        Ok(Self {
            token: required_header(response, AUTH_TOKEN_HEADER)?,
            issued: required_header(response, TOKEN_ISSUED_HEADER)?,
            expires: required_header(response, TOKEN_EXPIRED_HEADER)?,
            management_url: response
                .header(MANAGEMENT_URL_HEADER)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        })
    }

    /// The session token sent as `X-Auth-Token`.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the token was issued.
    pub fn issued(&self) -> &str {
        &self.issued
    }

    /// When the token expires.
    pub fn expires(&self) -> &str {
        &self.expires
    }

    /// Endpoint announced by the handshake, if any.
    pub fn management_url(&self) -> Option<&str> {
        self.management_url.as_deref()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("issued", &self.issued)
            .field("expires", &self.expires)
            .field("management_url", &self.management_url)
            .finish()
    }
}

fn required_header(response: &ClodoResponse, name: &'static str) -> Result<String> {
    let value = response
        .headers()
        .get(name)
        .ok_or(ClodoError::MissingHeader(name))?;
    let value = value.to_str().map_err(|_| ClodoError::InvalidHeader(name))?;
    if value.is_empty() {
        return Err(ClodoError::MissingHeader(name));
    }
    Ok(value.to_string())
}
