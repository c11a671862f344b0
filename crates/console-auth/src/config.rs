//! Authentication configuration.
//!
//! Identity provider coordinates, the application's own origin and the
//! in-app routes used as redirect targets. Loaded from environment variables
//! with defaults suitable for local development.

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::token_store::DEFAULT_TOKEN_KEY;

/// In-app routes the core redirects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoutes {
    /// Login screen.
    pub login: String,

    /// "Access denied" screen.
    pub unauthorized: String,

    /// IdP redirect landing point.
    pub callback: String,

    /// Home view, the default resume target.
    pub home: String,
}

impl Default for AppRoutes {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            unauthorized: "/unauthorized".to_string(),
            callback: "/auth/callback".to_string(),
            home: "/dashboard".to_string(),
        }
    }
}

impl AppRoutes {
    /// Login path carrying a URL-encoded return target:
    /// `/login?nextUrl=%2Fcalendar%3Fmonth%3D3`.
    pub fn login_with_next(&self, next: &str) -> String {
        format!("{}?nextUrl={}", self.login, urlencoding::encode(next))
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// IdP tenant domain (e.g. `console.eu.auth0.com`).
    pub idp_domain: String,

    /// Client identifier registered with the IdP.
    pub client_id: String,

    /// This application's origin (`https://console.example.com`).
    pub app_origin: String,

    /// Storage key the bearer token is persisted under.
    pub token_key: String,

    /// Redirect targets.
    pub routes: AppRoutes,
}

impl Default for AuthConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            idp_domain: String::new(),
            client_id: String::new(),
            app_origin: "http://localhost:3000".to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            routes: AppRoutes::default(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CONSOLE_IDP_DOMAIN`: IdP tenant domain
    /// - `CONSOLE_IDP_CLIENT_ID`: IdP client identifier
    /// - `CONSOLE_APP_ORIGIN`: Application origin (default: http://localhost:3000)
    /// - `CONSOLE_HOME_PATH`: Home view (default: /dashboard)
    /// - `CONSOLE_TOKEN_KEY`: Token storage key (default: access_token)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            idp_domain: std::env::var("CONSOLE_IDP_DOMAIN").unwrap_or(default.idp_domain),
            client_id: std::env::var("CONSOLE_IDP_CLIENT_ID").unwrap_or(default.client_id),
            app_origin: std::env::var("CONSOLE_APP_ORIGIN").unwrap_or(default.app_origin),
            token_key: std::env::var("CONSOLE_TOKEN_KEY").unwrap_or(default.token_key),
            routes: AppRoutes {
                home: std::env::var("CONSOLE_HOME_PATH").unwrap_or(default.routes.home),
                ..default.routes
            },
        }
    }

    /// Validate that the IdP coordinates are present.
    pub fn validate_for_production(&self) -> AuthResult<()> {
        if self.idp_domain.is_empty() {
            return Err(AuthError::ConfigError(
                "Missing required environment variable: CONSOLE_IDP_DOMAIN".to_string(),
            ));
        }
        if self.client_id.is_empty() {
            return Err(AuthError::ConfigError(
                "Missing required environment variable: CONSOLE_IDP_CLIENT_ID".to_string(),
            ));
        }
        if !self.routes.home.starts_with('/') {
            return Err(AuthError::ConfigError(format!(
                "Home path must be absolute: {}",
                self.routes.home
            )));
        }
        Ok(())
    }

    /// Absolute URL of the login screen, used as the IdP's `returnTo`.
    pub fn login_page_url(&self) -> String {
        format!("{}{}", self.app_origin.trim_end_matches('/'), self.routes.login)
    }

    /// IdP logout endpoint that ends the IdP session and returns to the login
    /// screen.
    pub fn idp_logout_url(&self) -> String {
        format!(
            "https://{}/v2/logout?client_id={}&returnTo={}",
            self.idp_domain,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.login_page_url())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            idp_domain: "console.auth0.com".to_string(),
            client_id: "abc123".to_string(),
            app_origin: "https://console.example.com/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.token_key, "access_token");
        assert_eq!(config.routes.login, "/login");
        assert_eq!(config.routes.home, "/dashboard");
        assert!(config.validate_for_production().is_err());
    }

    #[test]
    fn test_login_with_next() {
        let routes = AppRoutes::default();
        assert_eq!(
            routes.login_with_next("/calendar?month=3"),
            "/login?nextUrl=%2Fcalendar%3Fmonth%3D3"
        );
    }

    #[test]
    fn test_idp_logout_url() {
        assert_eq!(
            config().idp_logout_url(),
            "https://console.auth0.com/v2/logout?client_id=abc123&returnTo=https%3A%2F%2Fconsole.example.com%2Flogin"
        );
    }

    #[test]
    fn test_validate_for_production() {
        let mut config = config();
        assert!(config.validate_for_production().is_ok());

        config.client_id.clear();
        assert!(config.validate_for_production().is_err());
    }
}
