//! Login screen behavior.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::backend::{AuthBackend, LoginTicket};
use crate::config::AppRoutes;
use crate::error::AuthResult;
use crate::location::{Location, NavigationMode, Navigator};
use crate::session::Session;

/// Where to go after login: the `nextUrl` query parameter when it names a
/// local path, otherwise `home`.
pub fn resolve_next_url(location: &Location, home: &str) -> String {
    location
        .query_param("nextUrl")
        .filter(|next| next.starts_with('/') && !next.starts_with("//"))
        .unwrap_or_else(|| home.to_string())
}

/// Drives the login screen.
pub struct LoginFlow {
    backend: Arc<dyn AuthBackend>,
    navigator: Arc<dyn Navigator>,
    routes: AppRoutes,
}

impl LoginFlow {
    /// Create a flow that leaves for the IdP through `navigator`.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        navigator: Arc<dyn Navigator>,
        routes: AppRoutes,
    ) -> Self {
        Self {
            backend,
            navigator,
            routes,
        }
    }

    /// Ask the backend for an IdP login URL and leave for it.
    ///
    /// An "already logged in" answer changes nothing.
    #[instrument(skip(self))]
    pub async fn start(&self) -> AuthResult<LoginTicket> {
        let next_url = resolve_next_url(&self.navigator.location(), &self.routes.home);

        let ticket = self.backend.request_login(&next_url).await.map_err(|e| {
            warn!(error = %e, "Login request failed");
            e
        })?;

        match &ticket {
            LoginTicket::Redirect(url) => {
                info!(next_url = %next_url, "Redirecting to identity provider");
                self.navigator.redirect(url);
            }
            LoginTicket::AlreadyLoggedIn => debug!("Backend reports an active login"),
        }
        Ok(ticket)
    }

    /// Leave the login screen when the session is already authenticated.
    ///
    /// Returns whether a navigation happened.
    pub fn resume_if_authenticated(&self, session: &Session) -> bool {
        if !session.is_authenticated() {
            return false;
        }
        let next_url = resolve_next_url(&self.navigator.location(), &self.routes.home);
        self.navigator.navigate(&next_url, NavigationMode::Push);
        true
    }
}
