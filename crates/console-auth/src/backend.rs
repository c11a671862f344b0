//! The backend seam.
//!
//! The session manager and login flow only need two backend calls. They reach
//! them through [`AuthBackend`] so the HTTP client can live in its own crate
//! and tests can substitute a fake.

use async_trait::async_trait;

use crate::error::AuthResult;
use crate::profile::UserProfile;

/// Answer of the login-request endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginTicket {
    /// Send the browser to this IdP URL.
    Redirect(String),

    /// The backend already accepts the caller's credential.
    AlreadyLoggedIn,
}

/// Auth endpoints of the console backend.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Fetch the signed-in user's profile (`GET /api/user-info`) with the
    /// stored bearer token attached.
    ///
    /// Any failure, including `success: false` and a missing `user_info`,
    /// is an error.
    async fn fetch_profile(&self) -> AuthResult<UserProfile>;

    /// Ask the backend for an IdP login URL that resumes at `next_url`
    /// (`GET /api/request-login?nextUrl=...`).
    async fn request_login(&self, next_url: &str) -> AuthResult<LoginTicket>;
}
