//! Backend client errors.

use console_auth::AuthError;
use thiserror::Error;

/// Result type for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Backend client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// 401; the browser is already on its way to login.
    #[error("Authentication required")]
    Unauthenticated,

    /// 403; the browser is already on its way to the unauthorized page.
    #[error("Access forbidden")]
    Forbidden,

    /// Any other non-success status, passed through to the caller.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status behind the error, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) | ApiError::InvalidRequest(_) => None,
        }
    }

    /// Check if the interceptor already redirected for this error.
    pub fn is_redirected(&self) -> bool {
        matches!(self, ApiError::Unauthenticated | ApiError::Forbidden)
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthenticated => AuthError::Unauthenticated,
            ApiError::Forbidden => AuthError::Forbidden,
            other => AuthError::ProfileUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            AuthError::from(ApiError::Unauthenticated),
            AuthError::Unauthenticated
        ));
        assert!(matches!(AuthError::from(ApiError::Forbidden), AuthError::Forbidden));

        let err = AuthError::from(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, AuthError::ProfileUnavailable(ref m) if m.contains("500")));
    }

    #[test]
    fn test_status() {
        assert_eq!(ApiError::Forbidden.status(), Some(403));
        assert_eq!(ApiError::InvalidResponse("x".to_string()).status(), None);
        assert!(ApiError::Unauthenticated.is_redirected());
        assert!(!ApiError::Status { status: 404, message: String::new() }.is_redirected());
    }
}
