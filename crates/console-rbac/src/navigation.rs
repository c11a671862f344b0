//! # Navigation
//!
//! The console's sidebar manifest and the filter that projects it through a
//! permission set.
//!
//! Headers and links are filtered independently: a header with no required
//! permission stays visible even when every link beneath it is hidden, and a
//! hidden header does not hide the links after it.

use serde::{Deserialize, Serialize};

use crate::permissions::{Permission, PermissionSet};

/// Kind of a manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavKind {
    /// Section header.
    Header,

    /// Link to an in-app route.
    Link {
        /// Route segment (`dashboard`).
        segment: String,
        /// Absolute in-app path (`/dashboard`).
        path: String,
    },
}

/// One entry of the navigation manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Display title.
    pub title: String,

    /// Header or link.
    #[serde(flatten)]
    pub kind: NavKind,

    /// Permission required to see the entry; `None` means always visible once
    /// authenticated.
    #[serde(default, rename = "requiredPermission")]
    pub required_permission: Option<Permission>,
}

impl NavEntry {
    /// Create a section header.
    pub fn header(title: impl Into<String>, required_permission: Option<Permission>) -> Self {
        Self {
            title: title.into(),
            kind: NavKind::Header,
            required_permission,
        }
    }

    /// Create a link; the segment is derived from the path.
    pub fn link(
        title: impl Into<String>,
        path: impl Into<String>,
        required_permission: Option<Permission>,
    ) -> Self {
        let path = path.into();
        let segment = path.trim_start_matches('/').to_string();
        Self {
            title: title.into(),
            kind: NavKind::Link { segment, path },
            required_permission,
        }
    }

    /// Check if this entry is a section header.
    pub fn is_header(&self) -> bool {
        matches!(self.kind, NavKind::Header)
    }

    /// Path of a link entry.
    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            NavKind::Link { path, .. } => Some(path),
            NavKind::Header => None,
        }
    }

    /// Whether the entry is visible under the given permissions.
    pub fn is_visible(&self, permissions: &PermissionSet) -> bool {
        permissions.permits(self.required_permission.as_ref())
    }
}

/// Static ordered navigation manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationManifest {
    entries: Vec<NavEntry>,
}

impl NavigationManifest {
    /// Create a manifest from entries in display order.
    pub fn new(entries: Vec<NavEntry>) -> Self {
        Self { entries }
    }

    /// Load a manifest from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The attendance console's sidebar.
    pub fn console_default() -> Self {
        Self::new(vec![
            NavEntry::header("Main", None),
            NavEntry::link("Dashboard", "/dashboard", perm("get:dashboard")),
            NavEntry::link("Attendance", "/attendance", perm("get:attendance")),
            NavEntry::link("Calendar", "/calendar", perm("get:calendar")),
            NavEntry::header("Admin", perm("get:admin-panel")),
            NavEntry::link("Event Control", "/event-control", perm("post:events")),
            NavEntry::link(
                "Attendance Control",
                "/attendance-control",
                perm("post:attendance"),
            ),
            NavEntry::link(
                "Permission Control",
                "/permission-control",
                perm("assign:permission"),
            ),
            NavEntry::link("User Control", "/user-control", perm("post:user-info")),
        ])
    }

    /// All entries in order.
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Visible entries, see [`filter_navigation`].
    pub fn visible(&self, permissions: &PermissionSet) -> Vec<&NavEntry> {
        filter_navigation(self, permissions)
    }
}

/// Project a manifest through a permission set.
///
/// Returns, in manifest order, every entry whose required permission is
/// `None` or held in `permissions`. Pure: the same inputs always yield the
/// same output.
pub fn filter_navigation<'a>(
    manifest: &'a NavigationManifest,
    permissions: &PermissionSet,
) -> Vec<&'a NavEntry> {
    manifest
        .entries
        .iter()
        .filter(|entry| entry.is_visible(permissions))
        .collect()
}

fn perm(s: &str) -> Option<Permission> {
    Permission::parse(s).ok()
}
