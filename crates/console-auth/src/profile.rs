//! The backend's view of the signed-in user.

use console_rbac::PermissionSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Profile returned by `GET /api/user-info`.
///
/// The backend merges the token payload, the IdP's user record and the
/// console's own account row, so most identity fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// IdP subject
    #[serde(default)]
    pub sub: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// IdP nickname
    #[serde(default)]
    pub nickname: Option<String>,

    /// Avatar URL
    #[serde(default)]
    pub picture: Option<String>,

    /// The console's own account record
    #[serde(default)]
    pub db_info: Option<AccountRecord>,

    /// Authoritative permission list
    #[serde(default)]
    pub permissions: Option<Vec<String>>,

    /// Everything else the backend sent
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Account row kept by the console backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account ID
    pub id: i64,

    /// IdP subject the account is bound to
    #[serde(rename = "auth0_id")]
    pub idp_subject: String,

    /// Username
    pub username: String,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Job position
    #[serde(default)]
    pub position: Option<String>,

    /// Department
    #[serde(default)]
    pub department: Option<String>,

    /// Whether the account is active
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl UserProfile {
    /// Server-provided permissions. A profile without a list grants nothing.
    pub fn permission_set(&self) -> PermissionSet {
        self.permissions
            .as_deref()
            .map(PermissionSet::from_strings)
            .unwrap_or_default()
    }

    /// Name to show in the sidebar: account username, then nickname, then
    /// name, then email.
    pub fn display_name(&self) -> Option<&str> {
        self.db_info
            .as_ref()
            .map(|account| account.username.as_str())
            .or(self.nickname.as_deref())
            .or(self.name.as_deref())
            .or(self.email.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_from_backend_payload() {
        let profile: UserProfile = serde_json::from_value(json!({
            "sub": "auth0|user-1",
            "email": "ada@example.com",
            "nickname": "ada",
            "permissions": ["get:dashboard", "get:calendar"],
            "aud": ["console-api"],
            "db_info": {
                "id": 7,
                "auth0_id": "auth0|user-1",
                "username": "ada.l",
                "email": "ada@example.com",
                "position": "Engineer",
                "department": null
            }
        }))
        .unwrap();

        let account = profile.db_info.as_ref().unwrap();
        assert_eq!(account.id, 7);
        assert_eq!(account.idp_subject, "auth0|user-1");
        assert!(account.is_active);
        assert!(account.department.is_none());

        assert_eq!(profile.display_name(), Some("ada.l"));
        assert!(profile.extra.contains_key("aud"));
        assert_eq!(
            profile.permission_set().to_strings(),
            vec!["get:dashboard", "get:calendar"]
        );
    }

    #[test]
    fn test_profile_without_permissions_grants_nothing() {
        let profile: UserProfile = serde_json::from_value(json!({ "name": "Ada" })).unwrap();
        assert!(profile.permission_set().is_empty());
        assert_eq!(profile.display_name(), Some("Ada"));
    }
}
