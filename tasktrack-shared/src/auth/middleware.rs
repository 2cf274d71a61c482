/// Request authentication
///
/// Protected routes go through [`authenticate`]: the bearer token is pulled
/// from the `Authorization` header, validated, and turned into an
/// [`AuthContext`] that handlers read from request extensions. Every failure
/// short-circuits the request with 401 before any handler logic runs —
/// a missing or broken token is never downgraded to anonymous access.
///
/// Privileged routes additionally call [`AuthContext::require_admin`], which
/// terminates with 403 on a role mismatch.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::task::OwnerScope;
use crate::models::user::UserRole;

/// Authentication context for one request
///
/// Inserted into request extensions after a token validates; handlers
/// extract it with axum's `Extension` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Username from the token claims
    pub username: String,

    /// Role from the token claims
    pub role: UserRole,
}

impl AuthContext {
    /// Builds the context from validated claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }

    /// Store scope for this caller: admins are unscoped, everyone else is
    /// restricted to rows they own
    pub fn scope(&self) -> OwnerScope {
        if self.role.is_admin() {
            OwnerScope::All
        } else {
            OwnerScope::Owner(self.user_id)
        }
    }

    /// Rejects non-admin callers on privileged routes
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden("Admin role required".to_string()))
        }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a bearer token
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        };
        (status, self.to_string()).into_response()
    }
}

/// Extracts the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// Returns an error when the header is missing, not a bearer token, or the
/// token fails validation (bad signature, expired, wrong issuer).
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(e.to_string()),
    })?;

    Ok(AuthContext::from_claims(claims))
}
