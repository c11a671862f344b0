//! IdP redirect-back handling.
//!
//! The IdP returns to `/auth/callback#access_token=<token>&state=<path>`.
//! The token travels in the fragment so it never reaches a server log.
//! [`parse_fragment`] is the pure part; [`AuthCallbackHandler`] persists the
//! token and resumes navigation.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AppRoutes;
use crate::error::{AuthError, AuthResult};
use crate::location::{NavigationMode, Navigator};
use crate::token_store::TokenStore;

/// Text shown while the callback is being processed.
pub const PLACEHOLDER: &str = "Processing authentication, please wait...";

/// Values extracted from the callback fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// Bearer token issued by the IdP.
    pub access_token: String,

    /// In-app path to resume at.
    pub resume_path: String,
}

/// Extract the token and resume path from a callback fragment.
///
/// Returns `None` when `access_token` is missing or empty. A missing `state`,
/// or one that is not a same-origin absolute path, resumes at `default_resume`.
pub fn parse_fragment(fragment: &str, default_resume: &str) -> Option<CallbackParams> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);

    let mut access_token = None;
    let mut state = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" if access_token.is_none() => access_token = Some(value.into_owned()),
            "state" if state.is_none() => state = Some(value.into_owned()),
            _ => {}
        }
    }

    let access_token = access_token.filter(|token| !token.is_empty())?;
    let resume_path = state
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| default_resume.to_string());

    Some(CallbackParams {
        access_token,
        resume_path,
    })
}

// "/x" is local; "//host/x" is protocol-relative and leaves the origin.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}

/// State of a callback handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CallbackState {
    /// Not yet handled; the placeholder is showing.
    Processing,
    /// Token stored, navigated to the resume path.
    Resolved { resume_path: String },
    /// No usable token; navigated to login.
    Failed,
}

/// Single-use handler for the IdP redirect-back route.
pub struct AuthCallbackHandler {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    routes: AppRoutes,
    state: Mutex<CallbackState>,
}

impl std::fmt::Debug for AuthCallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCallbackHandler")
            .field("routes", &self.routes)
            .field("state", &*self.state.lock())
            .finish()
    }
}

impl AuthCallbackHandler {
    /// Create a handler in the processing state.
    pub fn new(
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        routes: AppRoutes,
    ) -> Self {
        Self {
            store,
            navigator,
            routes,
            state: Mutex::new(CallbackState::Processing),
        }
    }

    /// Current state.
    pub fn state(&self) -> CallbackState {
        self.state.lock().clone()
    }

    /// What to render: the placeholder while processing, nothing afterwards.
    pub fn placeholder(&self) -> Option<&'static str> {
        match *self.state.lock() {
            CallbackState::Processing => Some(PLACEHOLDER),
            _ => None,
        }
    }

    /// Process the current location's fragment.
    ///
    /// Runs once. Later calls return the settled state without touching the
    /// store or the navigator.
    ///
    /// Call before
    /// [`SessionManager::bootstrap`](crate::session::SessionManager::bootstrap)
    /// so the bootstrap finds the stored token.
    #[instrument(skip(self))]
    pub fn handle(&self) -> CallbackState {
        let mut state = self.state.lock();
        if *state != CallbackState::Processing {
            return state.clone();
        }

        let location = self.navigator.location();
        let fragment = location.fragment.unwrap_or_default();

        *state = match self.resolve(&fragment) {
            Ok(resume_path) => {
                info!(resume_path = %resume_path, "Stored token from IdP callback");
                self.navigator.navigate(&resume_path, NavigationMode::Replace);
                CallbackState::Resolved { resume_path }
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "IdP callback failed");
                self.navigator
                    .navigate(&self.routes.login, NavigationMode::Replace);
                CallbackState::Failed
            }
        };
        state.clone()
    }

    fn resolve(&self, fragment: &str) -> AuthResult<String> {
        let params =
            parse_fragment(fragment, &self.routes.home).ok_or(AuthError::CallbackMissingToken)?;
        self.store.set(&params.access_token)?;
        Ok(params.resume_path)
    }
}
