//! Bearer token storage.
//!
//! A token store holds exactly one opaque bearer token under a fixed key,
//! with no expiry metadata. Expiry is discovered reactively when the backend
//! answers 401.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Key the bearer token is stored under.
pub const DEFAULT_TOKEN_KEY: &str = "access_token";

/// Persistent holder for the bearer token.
///
/// Empty strings are never stored and never returned: a store either holds a
/// non-empty token or nothing.
pub trait TokenStore: Send + Sync {
    /// Current token, if any.
    fn get(&self) -> Option<String>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> AuthResult<()>;

    /// Remove the stored token. Clearing an empty store is a no-op.
    fn clear(&self) -> AuthResult<()>;

    /// Check if a token is present.
    fn has_token(&self) -> bool {
        self.get().is_some()
    }
}

fn reject_empty(token: &str) -> AuthResult<()> {
    if token.is_empty() {
        return Err(AuthError::InvalidToken("empty token".to_string()));
    }
    Ok(())
}

/// In-memory token store; lives as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTokenStore")
            .field("token", &self.token.read().as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            token: RwLock::new((!token.is_empty()).then_some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) -> AuthResult<()> {
        reject_empty(token)?;
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        *self.token.write() = None;
        Ok(())
    }
}

/// Token store backed by a JSON key/value file; survives restarts.
///
/// Other keys in the file are preserved. Writes go through a temporary file
/// and a rename so a crash never leaves a half-written store.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Open a store at `path` using the default key.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, DEFAULT_TOKEN_KEY)
    }

    /// Open a store at `path` using a custom key.
    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Open a store at `path` under the key `config` names.
    pub fn from_config(path: impl Into<PathBuf>, config: &AuthConfig) -> Self {
        Self::with_key(path, config.token_key.as_str())
    }

    /// Key the token is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> AuthResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| AuthError::Storage(format!("corrupt token file: {}", e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(&self.key).filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Unreadable token store, treating as empty"
                );
                None
            }
        }
    }

    fn set(&self, token: &str) -> AuthResult<()> {
        reject_empty(token)?;
        let _guard = self.write_lock.lock();

        // A corrupt file is replaced rather than blocking sign-in.
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(self.key.clone(), token.to_string());
        self.write_entries(&entries)?;

        debug!(path = %self.path.display(), "Stored bearer token");
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        let _guard = self.write_lock.lock();

        let mut entries = self.read_entries().unwrap_or_default();
        if entries.remove(&self.key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)?;

        debug!(path = %self.path.display(), "Cleared bearer token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.get().is_none());

        store.set("abc").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert!(store.has_token());

        store.clear().unwrap();
        assert!(store.get().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_rejects_empty() {
        let store = MemoryTokenStore::with_token("abc");
        assert!(matches!(store.set(""), Err(AuthError::InvalidToken(_))));
        assert_eq!(store.get().as_deref(), Some("abc"));

        assert!(MemoryTokenStore::with_token("").get().is_none());
    }

    #[test]
    fn test_memory_store_debug_redacts() {
        let store = MemoryTokenStore::with_token("secret-token");
        let debug = format!("{:?}", store);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        FileTokenStore::new(&path).set("abc").unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get().as_deref(), Some("abc"));

        reopened.clear().unwrap();
        assert!(FileTokenStore::new(&path).get().is_none());
    }

    #[test]
    fn test_file_store_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.set("abc").unwrap();
        store.clear().unwrap();

        let entries: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries.get("theme").map(String::as_str), Some("dark"));
        assert!(!entries.contains_key(DEFAULT_TOKEN_KEY));
    }

    #[test]
    fn test_file_store_missing_or_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileTokenStore::new(&path);
        assert!(store.get().is_none());
        store.clear().unwrap();

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();
        assert!(store.get().is_none());

        store.set("fresh").unwrap();
        assert_eq!(store.get().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_file_store_custom_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileTokenStore::with_key(&path, "console_token");
        store.set("abc").unwrap();
        assert!(FileTokenStore::new(&path).get().is_none());
        assert_eq!(store.get().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_uses_configured_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let config = AuthConfig {
            token_key: "console_token".to_string(),
            ..Default::default()
        };

        let store = FileTokenStore::from_config(&path, &config);
        assert_eq!(store.key(), "console_token");
        store.set("abc").unwrap();

        let entries: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(entries.get("console_token").map(String::as_str), Some("abc"));
        assert!(!entries.contains_key(DEFAULT_TOKEN_KEY));

        let defaults = FileTokenStore::from_config(&path, &AuthConfig::default());
        assert_eq!(defaults.key(), DEFAULT_TOKEN_KEY);
        assert!(defaults.get().is_none());
    }
}
