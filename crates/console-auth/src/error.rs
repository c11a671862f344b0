//! Error types for the authentication core
//!
//! This module defines the errors raised while bootstrapping a session,
//! handling the IdP callback, persisting tokens and talking to the backend's
//! auth endpoints.

use thiserror::Error;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the credential (HTTP 401)
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The credential is valid but lacks the permission (HTTP 403)
    #[error("Forbidden: insufficient permissions")]
    Forbidden,

    /// Token could not be decoded
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Profile fetch failed (network error, malformed body, `success: false`)
    #[error("Profile unavailable: {0}")]
    ProfileUnavailable(String),

    /// Login URL could not be obtained
    #[error("Login unavailable: {0}")]
    LoginUnavailable(String),

    /// IdP callback did not carry an access token
    #[error("Callback missing access token")]
    CallbackMissingToken,

    /// Token storage failed
    #[error("Token storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Auth failures are expected in normal operation (expired tokens,
    /// missing permissions) and are not.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AuthError::Storage(_) | AuthError::ConfigError(_) | AuthError::Internal(_)
        )
    }

    /// Check if this error means the credential itself is no good.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthenticated
                | AuthError::InvalidToken(_)
                | AuthError::CallbackMissingToken
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Unauthenticated
            | AuthError::InvalidToken(_)
            | AuthError::CallbackMissingToken => 401,

            AuthError::Forbidden => 403,

            AuthError::ProfileUnavailable(_) | AuthError::LoginUnavailable(_) => 502,

            AuthError::Storage(_) | AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::ProfileUnavailable(_) => "PROFILE_UNAVAILABLE",
            AuthError::LoginUnavailable(_) => "LOGIN_UNAVAILABLE",
            AuthError::CallbackMissingToken => "CALLBACK_MISSING_TOKEN",
            AuthError::Storage(_) => "STORAGE_ERROR",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::Unauthenticated.status_code(), 401);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::ProfileUnavailable("timeout".into()).status_code(), 502);
        assert_eq!(AuthError::Storage("disk full".into()).status_code(), 500);
    }

    #[test]
    fn test_classification() {
        assert!(AuthError::Unauthenticated.is_auth_failure());
        assert!(!AuthError::Forbidden.is_auth_failure());
        assert!(AuthError::Internal("boom".into()).is_server_error());
        assert!(!AuthError::Unauthenticated.is_server_error());
        assert_eq!(AuthError::CallbackMissingToken.error_code(), "CALLBACK_MISSING_TOKEN");
    }
}
