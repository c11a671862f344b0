//! # Routes
//!
//! The console's route table: which paths are public, which are gated and by
//! what permission, and where unknown paths fall back to.

use serde::{Deserialize, Serialize};

use crate::permissions::Permission;

/// What kind of screen a route leads to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteKind {
    /// The login screen.
    Login,
    /// Triggers a logout as soon as it is visited.
    Logout,
    /// Landing point of the IdP redirect.
    AuthCallback,
    /// The "access denied" screen.
    Unauthorized,
    /// A screen behind a permission gate.
    Protected {
        /// Permission the gate checks; `None` admits any authenticated user.
        #[serde(default, rename = "requiredPermission")]
        required_permission: Option<Permission>,
    },
}

/// A single route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Absolute path, without query or fragment.
    pub path: String,

    /// Route kind.
    #[serde(flatten)]
    pub kind: RouteKind,
}

impl Route {
    /// Create a route.
    pub fn new(path: impl Into<String>, kind: RouteKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Create a protected route.
    pub fn protected(path: impl Into<String>, required_permission: Option<Permission>) -> Self {
        Self::new(path, RouteKind::Protected { required_permission })
    }

    /// Check if the route sits behind a permission gate.
    pub fn is_protected(&self) -> bool {
        matches!(self.kind, RouteKind::Protected { .. })
    }

    /// Permission the route's gate requires, if any.
    pub fn required_permission(&self) -> Option<&Permission> {
        match &self.kind {
            RouteKind::Protected {
                required_permission,
            } => required_permission.as_ref(),
            _ => None,
        }
    }
}

/// Result of resolving a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    /// The path names a known route.
    Matched(&'a Route),

    /// Unknown path; replace the current history entry with `to`.
    Fallback {
        /// Target path.
        to: &'a str,
    },
}

/// Ordered route table with a catch-all fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: String,
}

impl RouteTable {
    /// Create a table; unknown paths are sent to `fallback`.
    pub fn new(routes: Vec<Route>, fallback: impl Into<String>) -> Self {
        Self {
            routes,
            fallback: fallback.into(),
        }
    }

    /// The attendance console's routes.
    pub fn console_default() -> Self {
        let protected =
            |path: &str, perm: &str| Route::protected(path, Permission::parse(perm).ok());

        Self::new(
            vec![
                Route::new("/login", RouteKind::Login),
                Route::new("/logout", RouteKind::Logout),
                Route::new("/auth/callback", RouteKind::AuthCallback),
                Route::new("/unauthorized", RouteKind::Unauthorized),
                protected("/dashboard", "get:dashboard"),
                protected("/attendance", "get:attendance"),
                protected("/calendar", "get:calendar"),
                protected("/event-control", "post:events"),
                protected("/attendance-control", "post:attendance"),
                protected("/permission-control", "assign:permission"),
                protected("/user-control", "post:user-info"),
                protected("/user-profile", "get:user-info"),
            ],
            "/dashboard",
        )
    }

    /// All routes in declaration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The fallback target.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Look up an exact path; query and fragment are ignored.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        let path = strip_suffixes(path);
        self.routes.iter().find(|route| route.path == path)
    }

    /// Resolve a path, falling back for unknown ones.
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        match self.lookup(path) {
            Some(route) => RouteMatch::Matched(route),
            None => RouteMatch::Fallback { to: &self.fallback },
        }
    }
}

fn strip_suffixes(path: &str) -> &str {
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
    &path[..end]
}
