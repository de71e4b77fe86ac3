//! Handler for the public contact form.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_core::contact::ContactMessage;
use folio_core::error::CoreError;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContactAccepted {
    pub message: &'static str,
}

/// POST /api/v1/contact
///
/// Validates the message before relaying it. Nothing is stored.
pub async fn send_message(
    State(state): State<AppState>,
    Json(input): Json<ContactMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactAccepted>>)> {
    input.check()?;

    let relay = state
        .relay
        .as_ref()
        .ok_or_else(|| CoreError::RelayFailed("no contact relay configured".into()))?;
    relay.send(&input).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: ContactAccepted {
                message: "Thank you for your message! I'll get back to you soon.",
            },
        }),
    ))
}
