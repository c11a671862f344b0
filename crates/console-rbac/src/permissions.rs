//! # Permissions
//!
//! Capability strings of the form `verb:resource` (e.g. `get:dashboard`,
//! `post:events`) and the ordered sets the console gates views with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing capability strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PermissionError {
    /// The string is not of the form `verb:resource`.
    #[error("Malformed permission '{0}': expected 'verb:resource'")]
    Malformed(String),
}

/// A single capability, `verb:resource`.
///
/// Both halves are kept verbatim; membership checks compare the full string,
/// so `get:dashboard` never matches `GET:dashboard`.
///
/// # Example
///
/// ```
/// use console_rbac::permissions::Permission;
///
/// let perm = Permission::parse("post:events").unwrap();
/// assert_eq!(perm.verb(), "post");
/// assert_eq!(perm.resource(), "events");
/// assert_eq!(perm.to_string(), "post:events");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    raw: String,
    split: usize,
}

impl Permission {
    /// Build a permission from its two halves.
    pub fn new(verb: &str, resource: &str) -> Result<Self, PermissionError> {
        Self::parse(&format!("{}:{}", verb, resource))
    }

    /// Parse a `verb:resource` string.
    ///
    /// The verb must be non-empty and contain no colon; the resource must be
    /// non-empty and may itself contain colons or hyphens (`post:user-info`).
    /// Surrounding whitespace is rejected rather than trimmed.
    pub fn parse(s: &str) -> Result<Self, PermissionError> {
        let malformed = || PermissionError::Malformed(s.to_string());

        if s.chars().any(char::is_whitespace) {
            return Err(malformed());
        }

        let split = s.find(':').ok_or_else(malformed)?;
        if split == 0 || split + 1 == s.len() {
            return Err(malformed());
        }

        Ok(Self {
            raw: s.to_string(),
            split,
        })
    }

    /// The verb half (`get` in `get:dashboard`).
    pub fn verb(&self) -> &str {
        &self.raw[..self.split]
    }

    /// The resource half (`dashboard` in `get:dashboard`).
    pub fn resource(&self) -> &str {
        &self.raw[self.split + 1..]
    }

    /// The full capability string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Permission> for String {
    fn from(perm: Permission) -> Self {
        perm.raw
    }
}

/// An ordered, de-duplicated set of permissions.
///
/// Insertion order is preserved so that a set built from a server list reads
/// back in the order the server sent it.
///
/// # Example
///
/// ```
/// use console_rbac::permissions::PermissionSet;
///
/// let set = PermissionSet::from_strings(["get:dashboard", "get:calendar", "get:dashboard"]);
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("get:calendar"));
/// assert!(set.permits(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PermissionSet {
    permissions: Vec<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: Vec::new(),
        }
    }

    /// Build a set from capability strings.
    ///
    /// Malformed entries are dropped: a string that is not `verb:resource`
    /// can never satisfy a gate, so leaving it out grants nothing extra.
    pub fn from_strings<I, S>(perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        perms
            .into_iter()
            .filter_map(|s| Permission::parse(s.as_ref()).ok())
            .collect()
    }

    /// Add a permission; returns `false` if it was already present.
    pub fn add(&mut self, permission: Permission) -> bool {
        if self.permissions.contains(&permission) {
            return false;
        }
        self.permissions.push(permission);
        true
    }

    /// Check membership by capability string.
    pub fn contains(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.as_str() == permission)
    }

    /// Check membership of a parsed permission.
    pub fn has(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Gate check: `true` when nothing is required or the requirement is held.
    pub fn permits(&self, required: Option<&Permission>) -> bool {
        required.map_or(true, |perm| self.has(perm))
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// The capability strings in insertion order.
    pub fn to_strings(&self) -> Vec<String> {
        self.permissions.iter().map(|p| p.to_string()).collect()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Clear all permissions.
    pub fn clear(&mut self) {
        self.permissions.clear();
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        let mut set = PermissionSet::new();
        for perm in iter {
            set.add(perm);
        }
        set
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(perms: Vec<String>) -> Self {
        Self::from_strings(perms)
    }
}

impl From<PermissionSet> for Vec<String> {
    fn from(set: PermissionSet) -> Self {
        set.to_strings()
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::slice::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}
