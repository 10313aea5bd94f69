//! The export command: authenticate, fetch, transform, write or summarize.
//!
//! # Usage
//!
//! ```bash
//! # Dry run: fetch everything, log a summary, write nothing
//! realm-export --dry-run
//!
//! # Full export into exports/users.json
//! realm-export --output-file users.json --pending-user-date 2020-12-01
//! ```
//!
//! # Environment Variables
//!
//! - `REALM_USERNAME` / `REALM_API_KEY` - Atlas programmatic API key pair
//! - `REALM_GROUP_ID` / `REALM_APP_ID` - project and app to export from

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::ExporterConfig;
use crate::export::{self, ExportEnvelope, ExportError, ExportWriter};
use crate::realm::{self, RealmClient, RealmError};

/// Options for one export run, already parsed and validated by clap.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Fetch and summarize without writing a file.
    pub dry_run: bool,
    /// Page size requested from the admin API.
    pub batch_size: u32,
    /// Requested output file name; relocated into the export directory.
    pub output_file: Option<String>,
    /// Date stamped onto every pending user.
    pub pending_user_date: NaiveDate,
}

/// Errors that can occur during an export run.
#[derive(Debug, Error)]
pub enum ExportRunError {
    /// Admin API call failed (auth or fetch); the run is aborted with no
    /// partial export.
    #[error(transparent)]
    Realm(#[from] RealmError),

    /// Export assembly or file write failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Run a full export: two sequential paginated fetches, normalization, and
/// either a file write or a logged summary.
///
/// # Errors
///
/// Any failure is fatal; there is no retry and no partial output.
pub async fn run(config: &ExporterConfig, options: &ExportOptions) -> Result<(), ExportRunError> {
    tracing::info!(group_id = %config.group_id, app_id = %config.app_id, "logging in to the admin API");
    let client = RealmClient::login(config).await?;

    tracing::info!("fetching users");
    let users = realm::list_users(
        &client,
        &config.group_id,
        &config.app_id,
        options.batch_size,
    )
    .await?;
    tracing::info!(count = users.len(), "users fetched");

    tracing::info!("fetching pending users");
    let pending_users = realm::list_pending_users(
        &client,
        &config.group_id,
        &config.app_id,
        options.batch_size,
    )
    .await?;
    tracing::info!(count = pending_users.len(), "pending users fetched");

    let pending_epoch = export::date_to_epoch_seconds(options.pending_user_date);
    let users = users.into_iter().map(export::normalize_user).collect();
    let pending_users = pending_users
        .into_iter()
        .map(|user| export::normalize_pending_user(user, pending_epoch))
        .collect();

    let envelope = ExportEnvelope::new(
        config.group_id.clone(),
        config.app_id.clone(),
        options.pending_user_date,
        users,
        pending_users,
    );

    match output_target(options) {
        Some(file_name) => {
            let path = ExportWriter::default().write(&envelope, file_name)?;
            tracing::info!(
                path = %path.display(),
                total_users = envelope.metadata.total_users,
                total_pending_users = envelope.metadata.total_pending_users,
                "export written"
            );
        }
        None => export::log_summary(&envelope),
    }

    Ok(())
}

/// A file is written only when an output file was requested AND dry-run is
/// off; every other combination summarizes to the log.
fn output_target(options: &ExportOptions) -> Option<&str> {
    if options.dry_run {
        return None;
    }
    options.output_file.as_deref()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn options(dry_run: bool, output_file: Option<&str>) -> ExportOptions {
        ExportOptions {
            dry_run,
            batch_size: 100,
            output_file: output_file.map(str::to_owned),
            pending_user_date: NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(),
        }
    }

    #[test]
    fn test_writes_only_with_file_and_no_dry_run() {
        assert_eq!(
            output_target(&options(false, Some("out.json"))),
            Some("out.json")
        );
        assert_eq!(output_target(&options(true, Some("out.json"))), None);
        assert_eq!(output_target(&options(false, None)), None);
        assert_eq!(output_target(&options(true, None)), None);
    }
}
