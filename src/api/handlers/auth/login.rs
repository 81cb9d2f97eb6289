use axum::{extract::Extension, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    message,
    payload::Payload,
    session::session_response,
    state::AuthState,
    types::{CredentialsRequest, MessageResponse, SessionResponse},
    MISSING_CREDENTIALS,
};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Authenticated, refresh cookie set", body = SessionResponse),
        (status = 400, description = "Missing fields or rejected credentials", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    Payload(payload): Payload<CredentialsRequest>,
) -> impl IntoResponse {
    let Some(credentials) = payload.and_then(CredentialsRequest::into_credentials) else {
        return message(StatusCode::BAD_REQUEST, MISSING_CREDENTIALS);
    };

    match auth_state
        .provider()
        .authenticate_with_password(&credentials)
        .await
    {
        Ok(session) => {
            debug!("Login succeeded");
            session_response(&auth_state, &session)
        }
        Err(err) => {
            debug!("Login rejected: {err}");
            message(StatusCode::BAD_REQUEST, err.message())
        }
    }
}
