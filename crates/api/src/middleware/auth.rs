//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::auth::AdminIdentity;
use folio_core::error::CoreError;

use crate::auth::jwt::{validate_token, ADMIN_ROLE};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated administrator extracted from a Bearer token.
///
/// Rejects missing, malformed, expired, revoked, and non-admin tokens with
/// `401 UNAUTHORIZED`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: String,
    /// Token id, used to revoke this token on logout.
    pub jti: String,
    /// Token expiry (Unix seconds).
    pub exp: i64,
}

impl AuthUser {
    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            email: self.email.clone(),
        }
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::AuthFailed(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        if claims.role != ADMIN_ROLE {
            return Err(unauthorized("Admin access required"));
        }
        if state.sessions.is_revoked(&claims.jti).await {
            return Err(unauthorized("Session has been logged out"));
        }

        Ok(AuthUser {
            email: claims.sub,
            role: claims.role,
            jti: claims.jti,
            exp: claims.exp,
        })
    }
}
