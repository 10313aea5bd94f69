//! Raw record types returned by the admin API.
//!
//! Deserialization is deliberately lenient: fields the export does not use
//! carry `#[serde(default)]` so server-side additions never break a run.

use realm_export_core::UserId;
use serde::Deserialize;

/// A confirmed user record as returned by the `users` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RealmUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Provider-populated profile data.
    #[serde(default)]
    pub data: UserData,
    /// Creation time in epoch seconds.
    pub creation_date: i64,
    /// Account type reported by the server (e.g. `normal`, `server`).
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub identities: Vec<Identity>,
}

/// Profile data attached to a user by its auth provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub email: Option<String>,
}

/// An auth-provider identity attached to a user.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub provider_type: Option<String>,
}

/// A registered-but-unconfirmed account from the `pending_users` listing.
/// Pending records carry no creation timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub login_ids: Vec<LoginId>,
}

/// A login identifier registered for a pending user.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginId {
    #[serde(default)]
    pub id_type: Option<String>,
    pub id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_from_server_shape() {
        let json = r#"{
            "_id": "5f1f2a9b8c7d6e0001",
            "identities": [{"id": "local-1", "provider_type": "local-userpass"}],
            "type": "normal",
            "creation_date": 1596222000,
            "disabled": false,
            "last_authentication_date": 1606780800,
            "data": {"email": "user@example.com"}
        }"#;

        let user: RealmUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_str(), "5f1f2a9b8c7d6e0001");
        assert_eq!(user.data.email.as_deref(), Some("user@example.com"));
        assert_eq!(user.creation_date, 1596222000);
        assert_eq!(user.account_type.as_deref(), Some("normal"));
        assert!(!user.disabled);
        assert_eq!(user.identities.len(), 1);
    }

    #[test]
    fn test_user_tolerates_sparse_records() {
        // Server-type users can lack profile data entirely
        let json = r#"{"_id": "abc", "creation_date": 0}"#;

        let user: RealmUser = serde_json::from_str(json).unwrap();
        assert!(user.data.email.is_none());
        assert!(user.identities.is_empty());
    }

    #[test]
    fn test_pending_user_deserializes() {
        let json = r#"{
            "_id": "5f20",
            "domain_id": "5f00",
            "login_ids": [{"id_type": "email", "id": "p@x.com"}]
        }"#;

        let pending: PendingUser = serde_json::from_str(json).unwrap();
        assert_eq!(pending.id.as_str(), "5f20");
        assert_eq!(pending.login_ids.len(), 1);
        assert_eq!(pending.login_ids.first().unwrap().id, "p@x.com");
    }
}
