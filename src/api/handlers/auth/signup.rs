use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    message,
    payload::Payload,
    state::AuthState,
    types::{CredentialsRequest, MessageResponse},
    MISSING_CREDENTIALS,
};
use crate::identity::SignupOutcome;

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "User registered, confirmation pending", body = SignupOutcome),
        (status = 400, description = "Missing fields or rejected by the identity provider", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signup(
    auth_state: Extension<Arc<AuthState>>,
    Payload(payload): Payload<CredentialsRequest>,
) -> impl IntoResponse {
    let Some(credentials) = payload.and_then(CredentialsRequest::into_credentials) else {
        return message(StatusCode::BAD_REQUEST, MISSING_CREDENTIALS);
    };

    match auth_state.provider().signup(&credentials).await {
        Ok(outcome) => {
            debug!(user_confirmed = outcome.user_confirmed, "Signup succeeded");
            (StatusCode::OK, Json(outcome)).into_response()
        }
        // Provider reasons (duplicate user, weak password, ...) go out verbatim.
        Err(err) => {
            debug!("Signup rejected: {err}");
            message(StatusCode::BAD_REQUEST, err.message())
        }
    }
}
