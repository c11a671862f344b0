//! # Console API
//!
//! HTTP client for the attendance console backend.
//!
//! ## Overview
//!
//! The console-api crate handles:
//! - **Transport**: `get/post/put/patch/delete` against the backend
//! - **Request interceptor**: Attaches `Authorization: Bearer <token>` when a
//!   token is stored
//! - **Response interceptor**: 401 redirects to login with a `nextUrl` return
//!   target, 403 redirects to the unauthorized page, everything else is
//!   passed through
//! - **Auth backend**: [`ApiClient`] implements `console_auth::AuthBackend`
//!   for the session manager and login flow
//!
//! No call is retried. Feature code never special-cases 401/403: those
//! responses never reach it as successes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use console_api::{ApiClient, ApiConfig, RequestOptions};
//! use console_auth::{AppRoutes, MemoryNavigator, MemoryTokenStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(
//!     &ApiConfig::from_env(),
//!     Arc::new(MemoryTokenStore::new()),
//!     Arc::new(MemoryNavigator::new("/calendar")?),
//!     AppRoutes::default(),
//! )?;
//!
//! let events: serde_json::Value = client
//!     .get("/api/events", &RequestOptions::new().query("month", "3"))
//!     .await?;
//! # let _ = events;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-export main types
pub use backend::{REQUEST_LOGIN_PATH, USER_INFO_PATH};
pub use classify::{classify, ResponseClass};
pub use client::{ApiClient, RequestOptions};
pub use config::{ApiConfig, ServiceEndpoint};
pub use error::{ApiError, ApiResult};
pub use types::{RequestLoginEnvelope, UserInfoEnvelope};
