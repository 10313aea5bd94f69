//! Paginated user listings.
//!
//! Both listings share one cursor-paginated fetch routine; the resource path
//! and the cursor field are supplied by the caller.

use realm_export_core::{AppId, GroupId, UserId};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::types::{PendingUser, RealmUser};
use super::{RealmClient, RealmError};

/// List every confirmed user of the app.
///
/// # Errors
///
/// Returns `RealmError` if any page request fails; no partial result is
/// returned.
#[instrument(skip(client))]
pub async fn list_users(
    client: &RealmClient,
    group_id: &GroupId,
    app_id: &AppId,
    batch_size: u32,
) -> Result<Vec<RealmUser>, RealmError> {
    let path = format!("/groups/{group_id}/apps/{app_id}/users");
    fetch_all(client, &path, batch_size, |user: &RealmUser| &user.id).await
}

/// List every pending (registered but unconfirmed) user of the app.
///
/// # Errors
///
/// Returns `RealmError` if any page request fails; no partial result is
/// returned.
#[instrument(skip(client))]
pub async fn list_pending_users(
    client: &RealmClient,
    group_id: &GroupId,
    app_id: &AppId,
    batch_size: u32,
) -> Result<Vec<PendingUser>, RealmError> {
    let path = format!("/groups/{group_id}/apps/{app_id}/user_registrations/pending_users");
    fetch_all(client, &path, batch_size, |user: &PendingUser| &user.id).await
}

/// Fetch every page of a cursor-paginated listing.
///
/// The cursor starts absent (no `after` parameter); after each page it
/// advances to the id of that page's last record, extracted by `last_id`.
/// The server signals completion with an empty page. Records are appended in
/// server response order. There is no page cap: an endpoint that never
/// returns an empty page keeps this loop running.
async fn fetch_all<T, F>(
    client: &RealmClient,
    path: &str,
    batch_size: u32,
    last_id: F,
) -> Result<Vec<T>, RealmError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> &UserId,
{
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page: Vec<T> = client.get_page(path, batch_size, cursor.as_deref()).await?;
        if page.is_empty() {
            break;
        }

        cursor = page.last().map(|record| last_id(record).as_str().to_owned());
        records.extend(page);
        tracing::debug!(total = records.len(), path, "fetched page");
    }

    Ok(records)
}
