//! Authenticated HTTP connection to the Clodo API.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::response::ClodoResponse;
use crate::session::{
    Credentials, Session, AUTH_KEY_HEADER, AUTH_TOKEN_HEADER, AUTH_USER_HEADER,
};

/// Default API entry point.
pub const DEFAULT_BASE_URL: &str = "https://api.clodo.ru/";

/// Path of the authentication handshake.
const AUTH_PATH: &str = "/";

/// `Accept` value sent on every request, the handshake included.
const ACCEPT_JSON: &str = "application/json";

/// Version segment that endpoint paths already carry.
const API_VERSION_SEGMENT: &str = "/v1";

/// Connection settings.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    base_url: String,
    timeout: Option<Duration>,
    follow_management_url: bool,
    http_client: Option<Client>,
}

impl ConnectionConfig {
    /// Settings for the default API endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Settings for a custom endpoint (for testing or a regional API host).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout: None,
            follow_management_url: true,
            http_client: None,
        }
    }

    /// Override the transport timeout. Without this the transport default applies.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether to switch to the endpoint announced in `X-Server-Management-Url`.
    pub fn follow_management_url(mut self, follow: bool) -> Self {
        self.follow_management_url = follow;
        self
    }

    /// Use a pre-built HTTP client instead of creating one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_client(&self) -> Result<Client> {
        if let Some(client) = &self.http_client {
            return Ok(client.clone());
        }
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An authenticated connection.
///
/// Construction performs the token handshake. Every request made afterwards
/// carries `Accept: application/json` and the session token, and goes through
/// the [`ClodoResponse`] envelope. Request bodies are form-encoded.
#[derive(Debug)]
pub struct Connection {
    inner: Client,
    base_url: String,
    session: Session,
}

impl Connection {
    /// Authenticate against the default endpoint.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        Self::connect_with(credentials, ConnectionConfig::new()).await
    }

    /// Authenticate against a custom endpoint.
    pub async fn connect_with_base_url(credentials: &Credentials, base_url: &str) -> Result<Self> {
        Self::connect_with(credentials, ConnectionConfig::with_base_url(base_url)).await
    }

    /// Authenticate with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClodoError::InvalidCredentials`](crate::ClodoError::InvalidCredentials)
    /// if the provider rejects the credentials, and
    /// [`ClodoError::MissingHeader`](crate::ClodoError::MissingHeader) if the
    /// handshake response lacks one of the token headers.
    pub async fn connect_with(credentials: &Credentials, config: ConnectionConfig) -> Result<Self> {
        let inner = config.build_client()?;
        let url = join_url(&config.base_url, AUTH_PATH);
        debug!(%url, user = credentials.user_id(), "authenticating");

        let response = inner
            .get(&url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(AUTH_USER_HEADER, credentials.user_id())
            .header(AUTH_KEY_HEADER, credentials.key())
            .send()
            .await?;
        let response = ClodoResponse::read(response).await?;
        if !response.is_success() {
            warn!(status = %response.status(), "authentication failed");
            return Err(response.parse_error());
        }

        let session = Session::from_response(&response)?;
        info!(
            user = credentials.user_id(),
            expires = session.expires(),
            "authenticated"
        );

        let base_url = match session.management_url() {
            Some(url) if config.follow_management_url => {
                let rebound = management_base_url(url);
                info!(base_url = %rebound, "switching to management endpoint");
                rebound
            }
            _ => config.base_url,
        };

        Ok(Self {
            inner,
            base_url,
            session,
        })
    }

    /// The session issued by the handshake.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Base URL used for requests, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request without a body.
    pub async fn request(&self, method: Method, path: &str) -> Result<ClodoResponse> {
        self.send::<()>(method, path, None).await
    }

    /// Issue a request with a form-encoded body.
    pub async fn request_form<B>(&self, method: Method, path: &str, body: &B) -> Result<ClodoResponse>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, Some(body)).await
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<ClodoResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = join_url(&self.base_url, path);
        debug!(%method, %url, "sending request");

        let mut request = self
            .inner
            .request(method.clone(), &url)
            .header(ACCEPT, ACCEPT_JSON)
            .header(AUTH_TOKEN_HEADER, self.session.token());
        if let Some(payload) = body {
            request = request.form(payload);
        }

        let response = ClodoResponse::read(request.send().await?).await?;
        debug!(%method, %url, status = %response.status(), "received response");

        if response.is_success() {
            Ok(response)
        } else {
            warn!(%method, %url, status = %response.status(), "request failed");
            Err(response.parse_error())
        }
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Base URL derived from `X-Server-Management-Url`.
///
/// The header names the versioned endpoint (`https://api.clodo.ru/v1`), while
/// request paths start with `v1/`, so one trailing version segment is dropped.
fn management_base_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    normalize_base_url(
        trimmed
            .strip_suffix(API_VERSION_SEGMENT)
            .unwrap_or(trimmed),
    )
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url, path.trim_start_matches('/'))
}
