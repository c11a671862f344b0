//! # Console Authentication
//!
//! Client-side authentication and authorization core of the attendance
//! console.
//!
//! ## Overview
//!
//! The console-auth crate handles:
//! - **Tokens**: One opaque bearer token, persisted under a fixed key
//! - **Sessions**: A single bootstrap per page load, fail-closed on any error
//! - **IdP callback**: Token extraction from the redirect-back fragment
//! - **Gating**: Per-route permission checks and route dispatch
//! - **Login**: Resolving the return target and leaving for the IdP
//!
//! ## Page-load order
//!
//! Data flows callback handler → token store → session bootstrap → gates.
//! The session manager reads the store once per page load, so on
//! `/auth/callback` the host runs [`AuthCallbackHandler::handle`] before
//! [`SessionManager::bootstrap`]. On every other route, bootstrap runs first
//! and gates wait on it through the `loading` state.
//!
//! The HTTP side lives in `console-api`, which implements [`AuthBackend`].
//! Permissions, the navigation manifest and the route table live in
//! `console-rbac`.
//!
//! ## Usage
//!
//! ### IdP callback
//!
//! ```rust
//! use console_auth::{
//!     AppRoutes, AuthCallbackHandler, CallbackState, MemoryNavigator, MemoryTokenStore,
//!     TokenStore,
//! };
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryTokenStore::new());
//! let navigator = Arc::new(MemoryNavigator::new(
//!     "/auth/callback#access_token=abc&state=%2Fcalendar",
//! )?);
//!
//! let handler = AuthCallbackHandler::new(store.clone(), navigator.clone(), AppRoutes::default());
//! assert_eq!(
//!     handler.handle(),
//!     CallbackState::Resolved { resume_path: "/calendar".to_string() }
//! );
//! assert_eq!(store.get().as_deref(), Some("abc"));
//! # Ok::<(), console_auth::AuthError>(())
//! ```
//!
//! ### Permission gate
//!
//! ```rust
//! use console_auth::{AppRoutes, GateState, PermissionGate, Session, SessionStatus};
//! use console_rbac::{Permission, PermissionSet};
//!
//! let gate = PermissionGate::new(Permission::parse("post:events").ok(), AppRoutes::default());
//! let session = Session {
//!     status: SessionStatus::Authenticated,
//!     permissions: PermissionSet::from_strings(["get:dashboard"]),
//!     ..Default::default()
//! };
//! assert_eq!(gate.evaluate(&session), GateState::Forbidden);
//! ```

pub mod backend;
pub mod callback;
pub mod claims;
pub mod config;
pub mod error;
pub mod gate;
pub mod location;
pub mod login;
pub mod profile;
pub mod router;
pub mod session;
pub mod token_store;

// Re-export main types
pub use backend::{AuthBackend, LoginTicket};
pub use callback::{parse_fragment, AuthCallbackHandler, CallbackParams, CallbackState};
pub use claims::{decode_unverified, Audience, TokenClaims};
pub use config::{AppRoutes, AuthConfig};
pub use error::{AuthError, AuthResult};
pub use gate::{GateDecision, GateState, PermissionGate};
pub use location::{Location, MemoryNavigator, NavigationEvent, NavigationMode, Navigator};
pub use login::{resolve_next_url, LoginFlow};
pub use profile::{AccountRecord, UserProfile};
pub use router::{RouteDecision, Router};
pub use session::{Session, SessionManager, SessionStatus};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, DEFAULT_TOKEN_KEY};
