//! Browser location and navigation.
//!
//! The core never touches a browser directly. It reads the current location
//! and requests navigations through a [`Navigator`], which hosts implement
//! over their real history stack and tests substitute with
//! [`MemoryNavigator`].

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AuthError, AuthResult};

/// Path, query and fragment of the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Absolute path (`/calendar`).
    pub path: String,

    /// Query string without the leading `?`.
    pub query: Option<String>,

    /// Fragment without the leading `#`.
    pub fragment: Option<String>,
}

impl Location {
    /// Parse an absolute URL or an origin-relative reference
    /// (`/calendar?month=3#today`).
    pub fn parse(s: &str) -> AuthResult<Self> {
        let base = Url::parse("http://localhost/")
            .map_err(|e| AuthError::Internal(format!("invalid base URL: {}", e)))?;
        let url = base
            .join(s)
            .map_err(|e| AuthError::Internal(format!("invalid location '{}': {}", s, e)))?;

        Ok(Self {
            path: url.path().to_string(),
            query: url.query().map(String::from),
            fragment: url.fragment().map(String::from),
        })
    }

    /// Path plus query (`/calendar?month=3`), the form used as a post-login
    /// return target.
    pub fn path_and_query(&self) -> String {
        match self.query.as_deref() {
            Some(query) if !query.is_empty() => format!("{}?{}", self.path, query),
            _ => self.path.clone(),
        }
    }

    /// Value of a query parameter, decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// How an in-app navigation treats the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Add a history entry.
    Push,
    /// Replace the current history entry.
    Replace,
}

/// Access to the page's location and history.
pub trait Navigator: Send + Sync {
    /// Current location.
    fn location(&self) -> Location;

    /// Full top-level navigation: the page is unloaded and `url` loaded in
    /// its place. Required whenever another origin's state (the IdP session)
    /// must be touched, or when in-memory state must not survive.
    fn redirect(&self, url: &str);

    /// In-app route change; the page and its state survive.
    fn navigate(&self, path: &str, mode: NavigationMode);
}

/// A navigation requested through a [`MemoryNavigator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Full top-level navigation.
    Redirect(String),

    /// In-app route change.
    Navigate {
        /// Target path.
        path: String,
        /// History mode.
        mode: NavigationMode,
    },
}

/// Navigator that records requests instead of performing them.
///
/// In-app navigations update the current location; redirects only get
/// recorded, since the page that issued them is going away.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    location: RwLock<Location>,
    events: Mutex<Vec<NavigationEvent>>,
}

impl MemoryNavigator {
    /// Create a navigator positioned at `location`.
    pub fn new(location: &str) -> AuthResult<Self> {
        Ok(Self::at(Location::parse(location)?))
    }

    /// Create a navigator positioned at an already-parsed location.
    pub fn at(location: Location) -> Self {
        Self {
            location: RwLock::new(location),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Move to a new location without recording an event.
    pub fn set_location(&self, location: Location) {
        *self.location.write() = location;
    }

    /// Every recorded navigation, oldest first.
    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().clone()
    }

    /// Targets of recorded redirects, oldest first.
    pub fn redirects(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Redirect(url) => Some(url.clone()),
                NavigationEvent::Navigate { .. } => None,
            })
            .collect()
    }

    /// Most recent event.
    pub fn last_event(&self) -> Option<NavigationEvent> {
        self.events.lock().last().cloned()
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> Location {
        self.location.read().clone()
    }

    fn redirect(&self, url: &str) {
        self.events
            .lock()
            .push(NavigationEvent::Redirect(url.to_string()));
    }

    fn navigate(&self, path: &str, mode: NavigationMode) {
        if let Ok(location) = Location::parse(path) {
            self.set_location(location);
        }
        self.events.lock().push(NavigationEvent::Navigate {
            path: path.to_string(),
            mode,
        });
    }
}
