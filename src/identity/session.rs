use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    claims::{self, AccessClaims, IdClaims},
    error::ProviderError,
};

/// Email/password pair, alive only for the duration of one request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Identity handle returned by a successful signup.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub username: String,
    pub user_sub: String,
    pub user_confirmed: bool,
}

/// Result of a successful authentication exchange.
///
/// Only built from tokens the provider returned; a new session replaces the
/// previous one on refresh.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: SecretString,
    refresh_token: SecretString,
    access_expiry: DateTime<Utc>,
    auth_time: DateTime<Utc>,
    email: String,
}

impl Session {
    /// Build a session from the provider's token set.
    ///
    /// # Errors
    /// Returns `ProviderError` if the access token lacks `exp`/`auth_time`, the
    /// ID token lacks `email`, or a timestamp is out of range.
    pub fn from_tokens(
        access_token: String,
        id_token: &str,
        refresh_token: SecretString,
    ) -> Result<Self, ProviderError> {
        let access: AccessClaims = claims::decode(&access_token)
            .map_err(|err| ProviderError::new(format!("invalid access token: {err}")))?;
        let id: IdClaims = claims::decode(id_token)
            .map_err(|err| ProviderError::new(format!("invalid id token: {err}")))?;

        let access_expiry = DateTime::from_timestamp(access.exp, 0)
            .ok_or_else(|| ProviderError::new("access token exp out of range"))?;
        let auth_time = DateTime::from_timestamp(access.auth_time, 0)
            .ok_or_else(|| ProviderError::new("access token auth_time out of range"))?;

        Ok(Self {
            access_token: SecretString::from(access_token),
            refresh_token,
            access_expiry,
            auth_time,
            email: id.email,
        })
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    #[must_use]
    pub fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    #[must_use]
    pub const fn access_expiry(&self) -> DateTime<Utc> {
        self.access_expiry
    }

    #[must_use]
    pub const fn auth_time(&self) -> DateTime<Utc> {
        self.auth_time
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};
    use serde_json::json;

    fn jwt(payload: &serde_json::Value) -> String {
        let body = Base64UrlUnpadded::encode_string(payload.to_string().as_bytes());
        format!("eyJhbGciOiJub25lIn0.{body}.sig")
    }

    #[test]
    fn session_from_tokens_reads_claims() -> Result<(), ProviderError> {
        let access = jwt(&json!({ "exp": 1_700_000_000, "auth_time": 1_699_999_000 }));
        let id = jwt(&json!({ "email": "alice@example.com" }));
        let session = Session::from_tokens(access.clone(), &id, SecretString::from("r1".to_string()))?;

        assert_eq!(session.access_token(), access);
        assert_eq!(session.refresh_token(), "r1");
        assert_eq!(session.email(), "alice@example.com");
        assert_eq!(session.access_expiry().timestamp_millis(), 1_700_000_000_000);
        assert_eq!(session.auth_time().timestamp(), 1_699_999_000);
        Ok(())
    }

    #[test]
    fn session_from_tokens_rejects_missing_email() {
        let access = jwt(&json!({ "exp": 1, "auth_time": 1 }));
        let id = jwt(&json!({ "sub": "abc" }));
        let result = Session::from_tokens(access, &id, SecretString::from("r".to_string()));
        assert!(result.is_err_and(|err| err.message().starts_with("invalid id token")));
    }

    #[test]
    fn session_debug_redacts_tokens() -> Result<(), ProviderError> {
        let access = jwt(&json!({ "exp": 1, "auth_time": 1 }));
        let id = jwt(&json!({ "email": "bob@example.com" }));
        let session = Session::from_tokens(access.clone(), &id, SecretString::from("refresh".to_string()))?;
        let debug = format!("{session:?}");
        assert!(!debug.contains(&access));
        assert!(!debug.contains("\"refresh\""));
        Ok(())
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials::new("alice@example.com", "hunter2");
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}
