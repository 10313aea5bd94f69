//! Admin API authentication.
//!
//! Exchanges an Atlas programmatic API key pair for a bearer token used by
//! every other admin API call.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::RealmError;

/// Login endpoint path, relative to the admin API base URL.
const LOGIN_PATH: &str = "/auth/providers/mongodb-cloud/login";

/// A logged-in admin API session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token for subsequent API requests.
    pub access_token: SecretString,
}

/// Request body for the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    #[serde(rename = "apiKey")]
    api_key: &'a str,
}

/// Response from the login endpoint. The refresh token and device fields the
/// server also returns are not needed for a single sequential run.
#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Authenticate with the admin API using a programmatic API key pair.
///
/// # Errors
///
/// Returns `RealmError::AuthenticationFailed` carrying the HTTP status and
/// response body if the credentials are rejected; the raw body is also
/// logged at `debug` level.
#[instrument(skip(client, api_key), fields(username = %username))]
pub(crate) async fn authenticate(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    api_key: &SecretString,
) -> Result<Session, RealmError> {
    let response = client
        .post(format!("{base_url}{LOGIN_PATH}"))
        .json(&LoginRequest {
            username,
            api_key: api_key.expose_secret(),
        })
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| RealmError::Parse(format!("Failed to parse login response: {e}")))?;

        Ok(Session {
            access_token: SecretString::from(login.access_token),
        })
    } else {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_owned());

        tracing::debug!(status = status.as_u16(), body = %body, "login rejected");

        Err(RealmError::AuthenticationFailed(format!(
            "HTTP {status}: {body}"
        )))
    }
}
