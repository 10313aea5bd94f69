//! End-to-end export flow against the mock admin API: login, two paginated
//! fetches, normalization, envelope assembly, and the file write.

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use wiremock::MockServer;

use realm_export_cli::export::{self, ExportEnvelope, ExportWriter, NormalizedUser};
use realm_export_cli::realm::{self, RealmClient};
use realm_export_core::UserStatus;
use realm_export_integration_tests::{
    mock_config, mount_login, mount_paged_listing, pending_record, pending_users_path,
    user_record, users_path,
};

/// 2 active users + 1 pending user with login id `p@x.com` and a pending
/// date of 2020-12-01 produce a file with totals 2/1 and the pending record
/// stamped with the UTC-midnight epoch 1606780800.
#[tokio::test]
async fn test_full_export_writes_expected_envelope() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_paged_listing(
        &server,
        &users_path(),
        &[vec![
            user_record("1", "a@x.com", 1_500_000_000),
            user_record("2", "b@x.com", 1_500_000_100),
        ]],
    )
    .await;
    mount_paged_listing(
        &server,
        &pending_users_path(),
        &[vec![pending_record("3", "p@x.com")]],
    )
    .await;

    let config = mock_config(&server);
    let client = RealmClient::login(&config).await.unwrap();

    let users = realm::list_users(&client, &config.group_id, &config.app_id, 100)
        .await
        .unwrap();
    let pending_users = realm::list_pending_users(&client, &config.group_id, &config.app_id, 100)
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
    let pending_epoch = export::date_to_epoch_seconds(date);
    let users: Vec<NormalizedUser> = users.into_iter().map(export::normalize_user).collect();
    let pending_users: Vec<NormalizedUser> = pending_users
        .into_iter()
        .map(|user| export::normalize_pending_user(user, pending_epoch))
        .collect();

    let envelope = ExportEnvelope::new(
        config.group_id.clone(),
        config.app_id.clone(),
        date,
        users,
        pending_users,
    );

    let dir = tempfile::tempdir().unwrap();
    let writer = ExportWriter::new(dir.path().join("exports"));
    let path = writer.write(&envelope, "out.json").unwrap();
    assert_eq!(path, dir.path().join("exports").join("out.json"));

    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();

    assert_eq!(parsed["metadata"]["totalUsers"], 2);
    assert_eq!(parsed["metadata"]["totalPendingUsers"], 1);
    assert_eq!(parsed["metadata"]["pendingUserDate"], "2020-12-01");

    assert_eq!(parsed["users"][0]["id"], "1");
    assert_eq!(parsed["users"][0]["email"], "a@x.com");
    assert_eq!(parsed["users"][0]["createdAt"], 1_500_000_000);
    assert_eq!(parsed["users"][0]["status"], "active");
    assert_eq!(parsed["users"][1]["id"], "2");

    assert_eq!(parsed["pendingUsers"][0]["id"], "3");
    assert_eq!(parsed["pendingUsers"][0]["email"], "p@x.com");
    assert_eq!(parsed["pendingUsers"][0]["createdAt"], 1_606_780_800);
    assert_eq!(parsed["pendingUsers"][0]["status"], "pending");
}

#[tokio::test]
async fn test_multi_page_listings_concatenate_in_order() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_paged_listing(
        &server,
        &users_path(),
        &[
            vec![
                user_record("u1", "u1@x.com", 100),
                user_record("u2", "u2@x.com", 200),
            ],
            vec![
                user_record("u3", "u3@x.com", 300),
                user_record("u4", "u4@x.com", 400),
            ],
            vec![user_record("u5", "u5@x.com", 500)],
        ],
    )
    .await;
    mount_paged_listing(&server, &pending_users_path(), &[]).await;

    let config = mock_config(&server);
    let client = RealmClient::login(&config).await.unwrap();

    let users = realm::list_users(&client, &config.group_id, &config.app_id, 2)
        .await
        .unwrap();
    let ids: Vec<&str> = users.iter().map(|user| user.id.as_str()).collect();
    assert_eq!(ids, ["u1", "u2", "u3", "u4", "u5"]);

    let pending_users = realm::list_pending_users(&client, &config.group_id, &config.app_id, 2)
        .await
        .unwrap();
    assert!(pending_users.is_empty());
}

#[tokio::test]
async fn test_every_pending_record_gets_the_run_date() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_paged_listing(&server, &users_path(), &[]).await;
    mount_paged_listing(
        &server,
        &pending_users_path(),
        &[vec![
            pending_record("p1", "a@x.com"),
            pending_record("p2", "b@x.com"),
            pending_record("p3", "c@x.com"),
        ]],
    )
    .await;

    let config = mock_config(&server);
    let client = RealmClient::login(&config).await.unwrap();

    let pending_users = realm::list_pending_users(&client, &config.group_id, &config.app_id, 100)
        .await
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
    let pending_epoch = export::date_to_epoch_seconds(date);
    let normalized: Vec<NormalizedUser> = pending_users
        .into_iter()
        .map(|user| export::normalize_pending_user(user, pending_epoch))
        .collect();

    assert_eq!(normalized.len(), 3);
    for user in &normalized {
        assert_eq!(user.created_at, 1_606_780_800);
        assert_eq!(user.status, UserStatus::Pending);
    }
}

#[tokio::test]
async fn test_rejected_login_aborts_before_any_listing() {
    let server = MockServer::start().await;
    // no login mock mounted: wiremock answers 404, which is a non-2xx login

    let config = mock_config(&server);
    let err = RealmClient::login(&config).await.unwrap_err();

    assert!(matches!(
        err,
        realm_export_cli::realm::RealmError::AuthenticationFailed(_)
    ));
    // the server never saw a listing request
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path().contains("/auth/")));
}
