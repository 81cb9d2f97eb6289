use axum::{extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    message,
    payload::Payload,
    state::AuthState,
    types::{ConfirmRequest, MessageResponse},
};

#[utoipa::path(
    post,
    path = "/auth/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Signup confirmed", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid code", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn confirm(
    auth_state: Extension<Arc<AuthState>>,
    Payload(payload): Payload<ConfirmRequest>,
) -> impl IntoResponse {
    let Some((email, code)) = payload.and_then(ConfirmRequest::into_parts) else {
        return message(StatusCode::BAD_REQUEST, "missing email or code");
    };

    match auth_state.provider().confirm_signup(&email, &code).await {
        Ok(()) => message(StatusCode::OK, "Success"),
        Err(err) => {
            debug!("Confirmation rejected: {err}");
            message(StatusCode::BAD_REQUEST, err.message())
        }
    }
}
