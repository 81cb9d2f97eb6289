//! Session endpoints: refresh and logout.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::{
    cookies::{clear_refresh_cookie, extract_refresh_token, refresh_cookie, refresh_cookie_expiry},
    message,
    state::AuthState,
    types::{MessageResponse, SessionResponse},
};
use crate::identity::Session;

#[utoipa::path(
    get,
    path = "/auth/refresh-session",
    responses(
        (status = 200, description = "New access token issued, refresh cookie re-set", body = SessionResponse),
        (status = 401, description = "Missing or rejected refresh token", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn refresh_session(
    auth_state: Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(token) = extract_refresh_token(&headers) else {
        return message(StatusCode::UNAUTHORIZED, "No token supplied");
    };

    let refresh_token = SecretString::from(token);
    match auth_state
        .provider()
        .authenticate_with_refresh_token(&refresh_token)
        .await
    {
        Ok(session) => session_response(&auth_state, &session),
        Err(err) => {
            // The caller has to log in again; retrying the same token won't help.
            debug!("Refresh rejected: {err}");
            message(StatusCode::UNAUTHORIZED, err.message())
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Refresh cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Always clear the cookie, whether or not one was sent. The provider is not
    // contacted, so an already issued refresh token stays valid there.
    let mut response_headers = HeaderMap::new();
    match clear_refresh_cookie(auth_state.config(), Utc::now()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build logout cookie: {err}"),
    }
    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse::new("Success")),
    )
        .into_response()
}

/// `200` with the access token in the body and the refresh token in the cookie.
///
/// Shared by login and refresh so both set the cookie the same way.
pub(super) fn session_response(auth_state: &AuthState, session: &Session) -> Response {
    let Some(expires) = refresh_cookie_expiry(session.auth_time()) else {
        error!("Refresh cookie expiry out of range");
        return message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to build session cookie",
        );
    };

    let cookie = match refresh_cookie(auth_state.config(), session.refresh_token(), expires) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build refresh cookie: {err}");
            return message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build session cookie",
            );
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    (
        StatusCode::OK,
        headers,
        Json(SessionResponse::from(session)),
    )
        .into_response()
}
