//! App Services admin API client.
//!
//! Read-only access to the user listings of an Atlas App Services
//! application, used to drive the migration export.
//!
//! # API Reference
//!
//! - Base URL: `https://realm.mongodb.com/api/admin/v3.0` (overridable via
//!   `REALM_BASE_URL`, which tests point at a mock server)
//! - Authentication: programmatic API key exchanged for a bearer token via
//!   `POST /auth/providers/mongodb-cloud/login`; every other endpoint
//!   requires `Authorization: Bearer <token>`
//! - Pagination: `after=<lastId>` cursor query parameter

mod auth;
mod types;
mod users;

pub use auth::Session;
pub use types::*;
pub use users::{list_pending_users, list_users};

use std::fmt::Write as _;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::ExporterConfig;

/// Errors that can occur when interacting with the admin API.
#[derive(Debug, Error)]
pub enum RealmError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Login was rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Bearer token was rejected on an API call.
    #[error("Unauthorized: bearer token rejected")]
    Unauthorized,

    /// Resource not found (wrong group or app id).
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// App Services admin API client.
///
/// Holds the bearer token obtained at login as a default header on the
/// underlying HTTP client. All calls are sequential; no timeout is set, so a
/// hung call blocks the run.
#[derive(Clone)]
pub struct RealmClient {
    inner: Arc<RealmClientInner>,
}

struct RealmClientInner {
    http: reqwest::Client,
    base_url: String,
}

impl RealmClient {
    /// Authenticate and build a client for the configured app.
    ///
    /// Exchanges the configured username/API-key pair for a bearer token and
    /// installs it as the default `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns `RealmError::AuthenticationFailed` (carrying the HTTP status
    /// and response body) if the credentials are rejected.
    pub async fn login(config: &ExporterConfig) -> Result<Self, RealmError> {
        let login_http = reqwest::Client::new();
        let session = auth::authenticate(
            &login_http,
            &config.base_url,
            &config.username,
            &config.api_key,
        )
        .await?;

        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", session.access_token.expose_secret());
        let mut value = HeaderValue::from_str(&bearer)
            .map_err(|e| RealmError::Parse(format!("Invalid access token: {e}")))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(RealmClientInner {
                http,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Fetch one page of a cursor-paginated listing.
    pub(crate) async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        limit: u32,
        after: Option<&str>,
    ) -> Result<Vec<T>, RealmError> {
        let mut url = format!("{}{path}?limit={limit}", self.inner.base_url);
        if let Some(after) = after {
            let _ = write!(url, "&after={after}");
        }

        let response = self.inner.http.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Handle an API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, RealmError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| RealmError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse an error response from the admin API.
    async fn parse_error(response: reqwest::Response) -> RealmError {
        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            return RealmError::Unauthorized;
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_owned());

        if status == 404 {
            return RealmError::NotFound(message);
        }

        RealmError::Api { status, message }
    }
}

impl std::fmt::Debug for RealmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealmClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
