pub mod auth;
pub mod health;

use axum::{
    extract::OriginalUri,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::debug;

use self::auth::types::MessageResponse;

/// Fallback for unknown routes: `404 {"message": "<path> not found"}`.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    debug!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new(format!("{} not found", uri.path()))),
    )
}
