//! Optimistic claim decoding.
//!
//! The console reads the claims embedded in its bearer token to show the right
//! menu before the backend has answered. Nothing here verifies a signature:
//! decoded claims are a display hint and never the basis of a final decision.

use chrono::{DateTime, Utc};
use console_rbac::PermissionSet;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{AuthError, AuthResult};

/// Claims carried by an IdP access token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (IdP user ID)
    #[serde(default)]
    pub sub: Option<String>,

    /// Issuer
    #[serde(default)]
    pub iss: Option<String>,

    /// Audience
    #[serde(default)]
    pub aud: Audience,

    /// Expiration time (Unix timestamp)
    #[serde(default)]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: Option<i64>,

    /// Granted scopes, space separated
    #[serde(default)]
    pub scope: Option<String>,

    /// Capability strings granted to the user
    #[serde(default)]
    pub permissions: Option<Vec<String>>,

    /// Everything else
    #[serde(default, flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

/// Audience can be a single string or array of strings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(untagged)]
pub enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// Check if the audience contains a specific value.
    pub fn contains(&self, aud: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == aud,
            Audience::Multiple(v) => v.iter().any(|a| a == aud),
        }
    }
}

impl TokenClaims {
    /// Permission claim as a set, if the token carries one.
    pub fn permission_set(&self) -> Option<PermissionSet> {
        self.permissions.as_ref().map(PermissionSet::from_strings)
    }

    /// Get expiration as DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Check if the token has expired according to its own claim.
    ///
    /// Informational only; the backend decides by answering 401.
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| Utc::now().timestamp() >= exp)
            .unwrap_or(false)
    }
}

/// Decode a JWT's claims without verifying its signature, expiry or audience.
pub fn decode_unverified(token: &str) -> AuthResult<TokenClaims> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    /// Mint an HS256 token carrying `permissions` (or no permission claim).
    pub fn token_with_permissions(permissions: Option<&[&str]>) -> String {
        let mut claims = json!({
            "sub": "auth0|user-1",
            "iss": "https://console.auth0.com/",
            "aud": ["console-api"],
            "exp": 4_102_444_800i64,
            "iat": 1_700_000_000i64,
        });
        if let Some(perms) = permissions {
            claims["permissions"] = json!(perms);
        }
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"not-the-real-key"),
        )
        .unwrap()
    }
}
