//! Auth handlers and supporting modules.
//!
//! Every handler checks that its inputs are present, calls the identity
//! provider once, and shapes the outcome into JSON plus, for login and refresh,
//! the refresh cookie.
//!
//! ## Status codes
//!
//! - Missing input: `400`, the provider is never called.
//! - Provider rejection: `400` for signup, login and confirm; `401` for refresh,
//!   which means "log in again" rather than "fix the input".
//! - Logout: always `200`.

pub(crate) mod confirm;
mod cookies;
pub(crate) mod login;
mod payload;
pub(crate) mod session;
pub(crate) mod signup;
mod state;
pub(crate) mod types;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

pub use state::{AuthConfig, AuthState};

const MISSING_CREDENTIALS: &str = "missing email or password";

/// JSON `{"message": ...}` with the given status.
fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(types::MessageResponse::new(message))).into_response()
}
