//! # Console RBAC
//!
//! Permission model for the attendance console: capability strings, the
//! sets a session holds, the sidebar manifest and the route table.
//!
//! ## Architecture
//!
//! ```text
//! Permission = verb:resource
//!
//! Examples:
//!   "get:dashboard"      - See the dashboard
//!   "post:events"        - Create calendar events
//!   "assign:permission"  - Administer user permissions
//! ```
//!
//! Membership is exact: there are no wildcards and no implied verbs. A gate
//! with no required permission admits any authenticated session.
//!
//! ## Usage
//!
//! ```rust
//! use console_rbac::{filter_navigation, NavigationManifest, PermissionSet};
//!
//! let perms = PermissionSet::from_strings(["get:dashboard", "get:calendar"]);
//! let manifest = NavigationManifest::console_default();
//!
//! let titles: Vec<_> = filter_navigation(&manifest, &perms)
//!     .iter()
//!     .map(|entry| entry.title.as_str())
//!     .collect();
//! assert_eq!(titles, ["Main", "Dashboard", "Calendar"]);
//! ```

pub mod navigation;
pub mod permissions;
pub mod routes;

// Re-export main types for convenience
pub use navigation::{filter_navigation, NavEntry, NavKind, NavigationManifest};
pub use permissions::{Permission, PermissionError, PermissionSet};
pub use routes::{Route, RouteKind, RouteMatch, RouteTable};
