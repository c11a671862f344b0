//! Backend client configuration.
//!
//! Base URL and timeout of the console backend. Configuration is loaded from
//! environment variables with defaults for local development.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ApiError;

/// Configuration for the console backend client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Console backend.
    pub backend: ServiceEndpoint,

    /// Request timeout in seconds.
    pub default_timeout_secs: u64,
}

impl Default for ApiConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            backend: ServiceEndpoint {
                base_url: "http://localhost:5000".to_string(),
            },
            default_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CONSOLE_BACKEND_ENDPOINT`: Backend base URL (default: http://localhost:5000)
    /// - `CONSOLE_API_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            backend: ServiceEndpoint {
                base_url: std::env::var("CONSOLE_BACKEND_ENDPOINT")
                    .unwrap_or(default.backend.base_url),
            },
            default_timeout_secs: std::env::var("CONSOLE_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.default_timeout_secs),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Validate the backend URL.
    pub fn validate(&self) -> Result<(), ApiError> {
        let base = &self.backend.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ApiError::InvalidRequest(format!(
                "backend endpoint must be an http(s) URL: {}",
                base
            )));
        }
        Ok(())
    }
}

/// A single service endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Base URL (e.g., "https://api.console.example.com").
    pub base_url: String,
}

impl ServiceEndpoint {
    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.default_timeout_secs, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_service_endpoint_url() {
        let endpoint = ServiceEndpoint {
            base_url: "https://api.example.com/".to_string(),
        };

        assert_eq!(endpoint.url("/api/user-info"), "https://api.example.com/api/user-info");
        assert_eq!(endpoint.url("api/user-info"), "https://api.example.com/api/user-info");
    }

    #[test]
    fn test_validate_rejects_non_http() {
        let config = ApiConfig {
            backend: ServiceEndpoint {
                base_url: "localhost:5000".to_string(),
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ApiError::InvalidRequest(_))));
    }
}
