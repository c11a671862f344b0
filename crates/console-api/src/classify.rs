//! Response classification.

use reqwest::StatusCode;

/// How the response interceptor treats a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 2xx; handed to the caller.
    Ok,
    /// 401; redirect to login with a return target.
    Unauthenticated,
    /// 403; redirect to the unauthorized page.
    Forbidden,
    /// Anything else; passed through as an error.
    Other,
}

/// Classify a response status.
pub fn classify(status: StatusCode) -> ResponseClass {
    match status {
        StatusCode::UNAUTHORIZED => ResponseClass::Unauthenticated,
        StatusCode::FORBIDDEN => ResponseClass::Forbidden,
        s if s.is_success() => ResponseClass::Ok,
        _ => ResponseClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(StatusCode::OK), ResponseClass::Ok);
        assert_eq!(classify(StatusCode::NO_CONTENT), ResponseClass::Ok);
        assert_eq!(classify(StatusCode::UNAUTHORIZED), ResponseClass::Unauthenticated);
        assert_eq!(classify(StatusCode::FORBIDDEN), ResponseClass::Forbidden);
        assert_eq!(classify(StatusCode::NOT_FOUND), ResponseClass::Other);
        assert_eq!(classify(StatusCode::INTERNAL_SERVER_ERROR), ResponseClass::Other);
        assert_eq!(classify(StatusCode::FOUND), ResponseClass::Other);
    }
}
