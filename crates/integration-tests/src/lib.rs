//! Integration tests for the App Services user exporter.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p realm-export-integration-tests
//! ```
//!
//! This library hosts the shared test double: a wiremock stand-in for the
//! admin API with a login endpoint and cursor-paginated user listings that
//! page the way the real service does (`after=<lastId>`, empty page ends
//! the listing).

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use realm_export_cli::config::ExporterConfig;
use realm_export_core::{AppId, GroupId};

/// Group id the fixtures are mounted under.
pub const GROUP_ID: &str = "5f1f2a9b8c7d6e";
/// App id the fixtures are mounted under.
pub const APP_ID: &str = "exporter-demo-abcde";
/// Bearer token the login fixture hands out; listing fixtures require it.
pub const ACCESS_TOKEN: &str = "test-access-token";

/// Path of the confirmed-users listing for the fixture app.
#[must_use]
pub fn users_path() -> String {
    format!("/groups/{GROUP_ID}/apps/{APP_ID}/users")
}

/// Path of the pending-users listing for the fixture app.
#[must_use]
pub fn pending_users_path() -> String {
    format!("/groups/{GROUP_ID}/apps/{APP_ID}/user_registrations/pending_users")
}

/// Build an exporter config pointing at the mock server.
#[must_use]
pub fn mock_config(server: &MockServer) -> ExporterConfig {
    ExporterConfig {
        username: "mock-public-key".to_owned(),
        api_key: SecretString::from("mock-private-key"),
        group_id: GroupId::new(GROUP_ID),
        app_id: AppId::new(APP_ID),
        base_url: server.uri(),
    }
}

/// Mount the login endpoint, handing out [`ACCESS_TOKEN`].
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/providers/mongodb-cloud/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "refresh_token": "test-refresh-token",
        })))
        .mount(server)
        .await;
}

/// Mount a cursor-paginated listing under `resource_path`.
///
/// The first request (no `after` parameter) is served `pages[0]`; a request
/// with `after=<last id of pages[i]>` is served `pages[i + 1]`; the request
/// following the final non-empty page is served an empty page, ending the
/// listing. Every listing request must carry the fixture bearer token.
pub async fn mount_paged_listing(server: &MockServer, resource_path: &str, pages: &[Vec<Value>]) {
    let bearer = format!("Bearer {ACCESS_TOKEN}");

    let first = pages.first().cloned().unwrap_or_default();
    Mock::given(method("GET"))
        .and(path(resource_path))
        .and(header("Authorization", bearer.as_str()))
        .and(query_param_is_missing("after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&first))
        .mount(server)
        .await;

    let mut previous_last_id = last_id_of(&first);
    for page in pages.iter().skip(1) {
        let Some(after) = previous_last_id.take() else {
            break;
        };
        Mock::given(method("GET"))
            .and(path(resource_path))
            .and(header("Authorization", bearer.as_str()))
            .and(query_param("after", after.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .mount(server)
            .await;
        previous_last_id = last_id_of(page);
    }

    // terminating empty page
    if let Some(after) = previous_last_id {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .and(header("Authorization", bearer.as_str()))
            .and(query_param("after", after.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
    }
}

fn last_id_of(page: &[Value]) -> Option<String> {
    page.last()
        .and_then(|record| record.get("_id"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// A confirmed-user record in the server's wire shape.
#[must_use]
pub fn user_record(id: &str, email: &str, creation_date: i64) -> Value {
    json!({
        "_id": id,
        "identities": [{"id": format!("local-{id}"), "provider_type": "local-userpass"}],
        "type": "normal",
        "creation_date": creation_date,
        "disabled": false,
        "data": {"email": email},
    })
}

/// A pending-user record in the server's wire shape.
#[must_use]
pub fn pending_record(id: &str, login_id: &str) -> Value {
    json!({
        "_id": id,
        "domain_id": "5f00aa",
        "login_ids": [{"id_type": "email", "id": login_id}],
    })
}
