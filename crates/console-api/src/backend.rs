//! [`AuthBackend`] over the console backend.

use async_trait::async_trait;
use console_auth::{AuthBackend, AuthError, AuthResult, LoginTicket, UserProfile};
use tracing::{debug, instrument};

use crate::client::{ApiClient, RequestOptions};
use crate::types::{RequestLoginEnvelope, UserInfoEnvelope};

/// Profile endpoint.
pub const USER_INFO_PATH: &str = "/api/user-info";

/// Login-request endpoint.
pub const REQUEST_LOGIN_PATH: &str = "/api/request-login";

#[async_trait]
impl AuthBackend for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_profile(&self) -> AuthResult<UserProfile> {
        let envelope: UserInfoEnvelope = self.get(USER_INFO_PATH, &RequestOptions::new()).await?;
        let profile = envelope.into_profile()?;
        debug!(sub = ?profile.sub, "Fetched user profile");
        Ok(profile)
    }

    #[instrument(skip(self))]
    async fn request_login(&self, next_url: &str) -> AuthResult<LoginTicket> {
        let options = RequestOptions::new().query("nextUrl", next_url);

        self.get_bare::<RequestLoginEnvelope>(REQUEST_LOGIN_PATH, &options)
            .await
            .and_then(RequestLoginEnvelope::into_ticket)
            .map_err(|e| AuthError::LoginUnavailable(e.to_string()))
    }
}
