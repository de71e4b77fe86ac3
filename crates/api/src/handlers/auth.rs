//! Handlers for the `/auth` resource (login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_core::auth::{AdminIdentity, Credentials};

use crate::auth::jwt::{generate_access_token, ADMIN_ROLE};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful login response.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: AdminIdentity,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> AppResult<Json<AuthResponse>> {
    let identity = match state.config.admin.verify(&input) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(email = %input.email, error = %e, "Admin login rejected");
            return Err(e.into());
        }
    };

    let jwt = &state.config.jwt;
    let access_token = generate_access_token(&identity.email, ADMIN_ROLE, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(email = %identity.email, "Admin signed in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: identity,
    }))
}

/// POST /api/v1/auth/logout
///
/// Revokes the presented token. Later requests with it get 401.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> StatusCode {
    state.sessions.revoke(&user.jti, user.exp).await;
    tracing::info!(email = %user.email, "Admin signed out");
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
pub async fn me(user: AuthUser) -> Json<DataResponse<AdminIdentity>> {
    Json(DataResponse {
        data: user.identity(),
    })
}
