//! Normalized output records, the export envelope, and file writing.
//!
//! The envelope is assembled once per run: a metadata block plus the two
//! normalized record sets. It is either written as pretty-printed JSON into
//! the fixed `exports/` directory or summarized to the log (dry run).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, Utc};
use realm_export_core::{AppId, GroupId, UserId, UserStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::realm::{PendingUser, RealmUser};

/// Directory every export file is written into. Requested output paths are
/// reduced to their basename inside this directory.
pub const OUTPUT_DIR: &str = "exports";

/// Errors that can occur while assembling or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested file name has no usable basename.
    #[error("Invalid output file name: {0}")]
    InvalidFileName(String),

    /// Envelope serialization failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Filesystem operation failed.
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

/// A user record in the migration output shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedUser {
    pub id: UserId,
    pub email: String,
    /// Creation time in epoch seconds.
    pub created_at: i64,
    pub status: UserStatus,
}

/// Map a confirmed user. Pure projection of the raw record.
#[must_use]
pub fn normalize_user(user: RealmUser) -> NormalizedUser {
    NormalizedUser {
        id: user.id,
        email: user.data.email.unwrap_or_default(),
        created_at: user.creation_date,
        status: UserStatus::Active,
    }
}

/// Map a pending user.
///
/// Pending records carry no server-side creation date, so every one receives
/// the same caller-supplied `created_at` for the whole run. The email is the
/// first registered login identifier.
#[must_use]
pub fn normalize_pending_user(user: PendingUser, created_at: i64) -> NormalizedUser {
    NormalizedUser {
        id: user.id,
        email: user
            .login_ids
            .into_iter()
            .next()
            .map(|login| login.id)
            .unwrap_or_default(),
        created_at,
        status: UserStatus::Pending,
    }
}

/// Convert a calendar date to its UTC-midnight epoch seconds.
#[must_use]
pub fn date_to_epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Metadata block of the export envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// RFC 3339 timestamp of the run.
    pub export_date: String,
    pub group_id: GroupId,
    pub app_id: AppId,
    pub total_users: usize,
    pub total_pending_users: usize,
    /// The `YYYY-MM-DD` date substituted into every pending record.
    pub pending_user_date: String,
}

/// The complete export: metadata plus both record sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub metadata: ExportMetadata,
    pub users: Vec<NormalizedUser>,
    pub pending_users: Vec<NormalizedUser>,
}

impl ExportEnvelope {
    /// Assemble the envelope. Built once per run and never mutated.
    #[must_use]
    pub fn new(
        group_id: GroupId,
        app_id: AppId,
        pending_user_date: NaiveDate,
        users: Vec<NormalizedUser>,
        pending_users: Vec<NormalizedUser>,
    ) -> Self {
        Self {
            metadata: ExportMetadata {
                export_date: Utc::now().to_rfc3339(),
                group_id,
                app_id,
                total_users: users.len(),
                total_pending_users: pending_users.len(),
                pending_user_date: pending_user_date.to_string(),
            },
            users,
            pending_users,
        }
    }
}

/// Writes export envelopes into a fixed output directory.
///
/// Tests construct this with a temp directory; the binary uses
/// [`ExportWriter::default`], which targets [`OUTPUT_DIR`].
#[derive(Debug, Clone)]
pub struct ExportWriter {
    output_dir: PathBuf,
}

impl Default for ExportWriter {
    fn default() -> Self {
        Self::new(OUTPUT_DIR)
    }
}

impl ExportWriter {
    /// Create a writer targeting `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Reduce a requested file name to its basename inside the output
    /// directory. Directory components (including `..`) are stripped, so a
    /// write can never escape the output directory.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidFileName` if the input has no basename
    /// (e.g. `".."` or a trailing slash).
    pub fn resolve_path(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| ExportError::InvalidFileName(file_name.to_owned()))?;
        Ok(self.output_dir.join(name))
    }

    /// Serialize and write the envelope, returning the resolved path.
    ///
    /// Serialization completes in memory before a single write call, so a
    /// failure cannot leave a partial file behind. The output directory is
    /// created if absent.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` on an invalid file name, serialization failure,
    /// or filesystem failure.
    pub fn write(&self, envelope: &ExportEnvelope, file_name: &str) -> Result<PathBuf, ExportError> {
        let path = self.resolve_path(file_name)?;
        let json = serde_json::to_string_pretty(envelope)?;

        fs::create_dir_all(&self.output_dir)?;
        fs::write(&path, json)?;

        Ok(path)
    }
}

/// Log the run summary: metadata plus one sample record from each
/// non-empty set. Used for dry runs and when no output file was requested.
pub fn log_summary(envelope: &ExportEnvelope) {
    let meta = &envelope.metadata;
    tracing::info!(
        export_date = %meta.export_date,
        group_id = %meta.group_id,
        app_id = %meta.app_id,
        total_users = meta.total_users,
        total_pending_users = meta.total_pending_users,
        pending_user_date = %meta.pending_user_date,
        "export summary (no file written)"
    );

    if let Some(user) = envelope.users.first() {
        tracing::info!(sample = ?user, "sample user");
    }
    if let Some(user) = envelope.pending_users.first() {
        tracing::info!(sample = ?user, "sample pending user");
    }
}
