//! Request/response types for auth endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::identity::{Credentials, Session};

/// Body of `/signup` and `/login`. No `Debug`: it carries the password.
#[derive(ToSchema, Deserialize, Default)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// `None` unless both fields are present and non-empty.
    #[must_use]
    pub fn into_credentials(self) -> Option<Credentials> {
        let email = present(self.email)?;
        let password = present(self.password)?;
        Some(Credentials::new(email, password))
    }
}

#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ConfirmRequest {
    /// `(email, code)` when both are present and non-empty.
    #[must_use]
    pub fn into_parts(self) -> Option<(String, String)> {
        Some((present(self.email)?, present(self.code)?))
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SessionResponse {
    /// Access token.
    pub jwt: String,
    /// Access token expiry, RFC 3339 with milliseconds.
    pub jwt_expired: String,
    pub email: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            jwt: session.access_token().to_string(),
            jwt_expired: timestamp(session.access_expiry()),
            email: session.email().to_string(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// `2023-11-14T22:13:20.000Z`
pub(super) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
