//! Exporter configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `REALM_USERNAME` - Atlas programmatic API public key (login username)
//! - `REALM_API_KEY` - Atlas programmatic API private key
//! - `REALM_GROUP_ID` - Atlas project (group) ID containing the app
//! - `REALM_APP_ID` - App Services application ID to export from
//!
//! ## Optional
//! - `REALM_BASE_URL` - Admin API base URL (default: the public Atlas
//!   App Services admin API). Overridable so tests can point the client at
//!   a local mock server.
//!
//! All four credentials are validated before any network call; a missing or
//! empty value is a fatal configuration error.

use realm_export_core::{AppId, GroupId};
use secrecy::SecretString;
use thiserror::Error;

/// Default App Services admin API base URL.
pub const DEFAULT_BASE_URL: &str = "https://realm.mongodb.com/api/admin/v3.0";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Exporter configuration.
///
/// Implements `Debug` manually to redact the API private key.
#[derive(Clone)]
pub struct ExporterConfig {
    /// Atlas programmatic API public key, used as the login username
    pub username: String,
    /// Atlas programmatic API private key
    pub api_key: SecretString,
    /// Atlas project (group) ID
    pub group_id: GroupId,
    /// App Services application ID
    pub app_id: AppId,
    /// Admin API base URL
    pub base_url: String,
}

impl std::fmt::Debug for ExporterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExporterConfig")
            .field("username", &self.username)
            .field("api_key", &"[REDACTED]")
            .field("group_id", &self.group_id)
            .field("app_id", &self.app_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ExporterConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if any required variable is
    /// unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// The seam exists so tests can feed a map instead of mutating process
    /// environment variables.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let username = get_required(&lookup, "REALM_USERNAME")?;
        let api_key = get_required(&lookup, "REALM_API_KEY")?;
        let group_id = get_required(&lookup, "REALM_GROUP_ID")?;
        let app_id = get_required(&lookup, "REALM_APP_ID")?;
        let base_url = lookup("REALM_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        Ok(Self {
            username,
            api_key: SecretString::from(api_key),
            group_id: GroupId::new(group_id),
            app_id: AppId::new(app_id),
            base_url,
        })
    }
}

/// Get a required variable, treating empty values as missing.
fn get_required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
}
