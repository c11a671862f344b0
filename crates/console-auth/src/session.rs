//! Session state machine.
//!
//! [`SessionManager`] owns the one authoritative [`Session`] of a page load.
//! It bootstraps once, combining the stored token, the claims decoded from
//! it and the backend profile, and it is the only component that mutates the
//! session. Consumers read snapshots or subscribe to changes.
//!
//! ```text
//! uninitialized ──> loading ──> authenticated
//!                          └──> anonymous
//! ```
//!
//! Permissions go through two phases: the token's permission claim is adopted
//! provisionally while the profile request is in flight, then replaced
//! wholesale by the server's list. Any failure resolving the profile clears
//! the stored token and leaves the session anonymous.

use console_rbac::PermissionSet;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::backend::AuthBackend;
use crate::claims::decode_unverified;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::location::Navigator;
use crate::profile::UserProfile;
use crate::token_store::TokenStore;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Bootstrap has not started.
    Uninitialized,
    /// Bootstrap is resolving the profile.
    Loading,
    /// The backend accepted the token and returned a profile.
    Authenticated,
    /// No usable credential.
    Anonymous,
}

impl SessionStatus {
    /// Check if bootstrap has finished.
    pub fn is_settled(&self) -> bool {
        matches!(self, SessionStatus::Authenticated | SessionStatus::Anonymous)
    }
}

/// Authorization state of the current page load.
#[derive(Clone, PartialEq)]
pub struct Session {
    /// Lifecycle status.
    pub status: SessionStatus,

    /// Copy of the stored token. The token store stays the owner.
    pub token: Option<String>,

    /// Backend profile, present once authenticated.
    pub profile: Option<UserProfile>,

    /// Provisional claims while loading, the server's list once authenticated.
    pub permissions: PermissionSet,

    /// Authentication epoch; bumped by every logout.
    pub epoch: u64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("profile", &self.profile)
            .field("permissions", &self.permissions)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: SessionStatus::Uninitialized,
            token: None,
            profile: None,
            permissions: PermissionSet::new(),
            epoch: 0,
        }
    }
}

impl Session {
    /// Check if the session is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Check if bootstrap is still running (or has not started).
    pub fn is_loading(&self) -> bool {
        !self.status.is_settled()
    }

    /// Check a capability string against the current permissions.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    fn anonymous(epoch: u64) -> Self {
        Self {
            status: SessionStatus::Anonymous,
            epoch,
            ..Self::default()
        }
    }
}

/// Owner of the session state machine.
pub struct SessionManager {
    config: AuthConfig,
    store: Arc<dyn TokenStore>,
    backend: Arc<dyn AuthBackend>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<Session>,
    bootstrapped: AtomicBool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &*self.state.borrow())
            .field("bootstrapped", &self.bootstrapped.load(Ordering::SeqCst))
            .finish()
    }
}

impl SessionManager {
    /// Create a manager with an uninitialized session.
    pub fn new(
        config: AuthConfig,
        store: Arc<dyn TokenStore>,
        backend: Arc<dyn AuthBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            config,
            store,
            backend,
            navigator,
            state,
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Configuration in use.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Run the bootstrap sequence.
    ///
    /// Only the first call does any work; later calls return the current
    /// session untouched. No network call is made when no token is stored.
    ///
    /// The token store is read once, here. On the IdP callback load,
    /// [`AuthCallbackHandler::handle`](crate::callback::AuthCallbackHandler::handle)
    /// must run first; a bootstrap that runs before it settles anonymous for
    /// the rest of the page.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Session {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            debug!("Session already bootstrapped");
            return self.session();
        }

        let epoch = self.session().epoch;
        self.state.send_modify(|session| session.status = SessionStatus::Loading);

        let Some(token) = self.store.get() else {
            info!("No stored token; session is anonymous");
            self.state.send_replace(Session::anonymous(epoch));
            return self.session();
        };

        let provisional = match decode_unverified(&token) {
            Ok(claims) => claims.permission_set(),
            Err(e) => {
                debug!(error = %e, "Token claims not decodable; waiting for profile");
                None
            }
        };

        self.state.send_modify(|session| {
            session.token = Some(token);
            if let Some(permissions) = provisional {
                session.permissions = permissions;
            }
        });

        let result = self.backend.fetch_profile().await;

        if self.session().epoch != epoch {
            debug!("Session changed while the profile was loading; discarding result");
            return self.session();
        }

        match result {
            Ok(profile) => {
                let permissions = profile.permission_set();
                info!(permissions = permissions.len(), "Session authenticated");
                self.state.send_modify(|session| {
                    session.status = SessionStatus::Authenticated;
                    session.permissions = permissions;
                    session.profile = Some(profile);
                });
            }
            Err(e) => self.fail_closed(&e),
        }

        self.session()
    }

    /// Clear the token and the session, then leave through the IdP's logout
    /// endpoint so the IdP session ends too.
    pub fn logout(&self) {
        self.clear_token();

        let next_epoch = self.session().epoch + 1;
        self.state.send_replace(Session::anonymous(next_epoch));

        info!("Logging out through the identity provider");
        self.navigator.redirect(&self.config.idp_logout_url());
    }

    fn fail_closed(&self, err: &AuthError) {
        if err.is_server_error() {
            error!(error = %err, code = err.error_code(), "Profile fetch failed");
        } else {
            warn!(error = %err, code = err.error_code(), "Profile fetch failed");
        }

        self.clear_token();
        let epoch = self.session().epoch;
        self.state.send_replace(Session::anonymous(epoch));
    }

    fn clear_token(&self) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, "Failed to clear stored token");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::backend::LoginTicket;
    use crate::error::AuthResult;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// What the fake backend answers to a profile request.
    #[derive(Debug, Clone)]
    pub enum ProfileOutcome {
        Permissions(Vec<String>),
        Unauthenticated,
        Malformed,
    }

    /// Scripted backend with call counters and an optional hold point.
    pub struct FakeBackend {
        pub profile: Mutex<ProfileOutcome>,
        pub login: Mutex<Option<LoginTicket>>,
        pub profile_calls: AtomicUsize,
        pub login_calls: Mutex<Vec<String>>,
        pub started: Notify,
        pub release: Option<Notify>,
    }

    impl FakeBackend {
        pub fn new(profile: ProfileOutcome) -> Self {
            Self {
                profile: Mutex::new(profile),
                login: Mutex::new(None),
                profile_calls: AtomicUsize::new(0),
                login_calls: Mutex::new(Vec::new()),
                started: Notify::new(),
                release: None,
            }
        }

        pub fn with_permissions(perms: &[&str]) -> Self {
            Self::new(ProfileOutcome::Permissions(
                perms.iter().map(|p| p.to_string()).collect(),
            ))
        }

        /// Hold every profile request until `release` is notified.
        pub fn held(mut self) -> Self {
            self.release = Some(Notify::new());
            self
        }

        pub fn calls(&self) -> usize {
            self.profile_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn fetch_profile(&self) -> AuthResult<UserProfile> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            if let Some(release) = &self.release {
                release.notified().await;
            }

            let outcome = self.profile.lock().clone();
            match outcome {
                ProfileOutcome::Permissions(perms) => Ok(UserProfile {
                    sub: Some("auth0|user-1".to_string()),
                    permissions: Some(perms),
                    ..Default::default()
                }),
                ProfileOutcome::Unauthenticated => Err(AuthError::Unauthenticated),
                ProfileOutcome::Malformed => {
                    Err(AuthError::ProfileUnavailable("missing user_info".to_string()))
                }
            }
        }

        async fn request_login(&self, next_url: &str) -> AuthResult<LoginTicket> {
            self.login_calls.lock().push(next_url.to_string());
            self.login
                .lock()
                .clone()
                .ok_or_else(|| AuthError::LoginUnavailable("no login URL".to_string()))
        }
    }
}
