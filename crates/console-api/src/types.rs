//! Backend response envelopes.

use console_auth::{LoginTicket, UserProfile};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of `GET /api/user-info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfoEnvelope {
    /// Whether the backend resolved the user.
    #[serde(default)]
    pub success: bool,

    /// Merged profile.
    #[serde(default)]
    pub user_info: Option<UserProfile>,

    /// Failure detail.
    #[serde(default)]
    pub message: Option<String>,
}

impl UserInfoEnvelope {
    /// The profile, if the backend reported success and sent one.
    pub fn into_profile(self) -> Result<UserProfile, ApiError> {
        match (self.success, self.user_info) {
            (true, Some(profile)) => Ok(profile),
            (true, None) => Err(ApiError::InvalidResponse(
                "user-info response has no user_info".to_string(),
            )),
            (false, _) => Err(ApiError::InvalidResponse(
                self.message
                    .unwrap_or_else(|| "user-info request unsuccessful".to_string()),
            )),
        }
    }
}

/// Body of `GET /api/request-login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestLoginEnvelope {
    /// Whether the backend produced an answer.
    #[serde(default)]
    pub success: bool,

    /// IdP authorization URL.
    #[serde(default)]
    pub login_url: Option<String>,

    /// Informational message ("Already logged in").
    #[serde(default)]
    pub message: Option<String>,
}

impl RequestLoginEnvelope {
    /// Interpret the answer. Success without a URL means the backend already
    /// considers the caller logged in.
    pub fn into_ticket(self) -> Result<LoginTicket, ApiError> {
        if !self.success {
            return Err(ApiError::InvalidResponse(
                self.message
                    .unwrap_or_else(|| "login request unsuccessful".to_string()),
            ));
        }
        Ok(match self.login_url.filter(|url| !url.is_empty()) {
            Some(url) => LoginTicket::Redirect(url),
            None => LoginTicket::AlreadyLoggedIn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_info_envelope() {
        let envelope: UserInfoEnvelope = serde_json::from_value(json!({
            "success": true,
            "user_info": { "sub": "auth0|user-1", "permissions": ["get:dashboard"] }
        }))
        .unwrap();
        let profile = envelope.into_profile().unwrap();
        assert!(profile.permission_set().contains("get:dashboard"));

        let missing: UserInfoEnvelope = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(missing.into_profile().is_err());

        let failed: UserInfoEnvelope =
            serde_json::from_value(json!({ "success": false, "message": "User not found" }))
                .unwrap();
        assert!(matches!(
            failed.into_profile(),
            Err(ApiError::InvalidResponse(m)) if m == "User not found"
        ));
    }

    #[test]
    fn test_request_login_envelope() {
        let redirect: RequestLoginEnvelope = serde_json::from_value(json!({
            "success": true,
            "login_url": "https://console.auth0.com/authorize?client_id=abc"
        }))
        .unwrap();
        assert_eq!(
            redirect.into_ticket().unwrap(),
            LoginTicket::Redirect("https://console.auth0.com/authorize?client_id=abc".to_string())
        );

        let already: RequestLoginEnvelope =
            serde_json::from_value(json!({ "success": true, "message": "Already logged in" }))
                .unwrap();
        assert_eq!(already.into_ticket().unwrap(), LoginTicket::AlreadyLoggedIn);

        let failed: RequestLoginEnvelope =
            serde_json::from_value(json!({ "success": false })).unwrap();
        assert!(failed.into_ticket().is_err());
    }
}
