//! Read-only access to JWT claims.
//!
//! Tokens are never verified here; the provider issued them over TLS and the
//! gateway only needs a few claims to shape its response.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("invalid token format")]
    TokenFormat,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid claims: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims read from the access token.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Time of the original authentication, seconds since the epoch.
    pub auth_time: i64,
}

/// Claims read from the ID token.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IdClaims {
    pub email: String,
}

/// Decode the payload segment of a compact JWT into `T`.
///
/// # Errors
/// Returns `ClaimsError` if the token is not three dot-separated segments, the
/// payload is not base64url, or it does not deserialize into `T`.
pub fn decode<T: DeserializeOwned>(token: &str) -> Result<T, ClaimsError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(ClaimsError::TokenFormat),
    };

    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('='))
        .map_err(|_| ClaimsError::Base64)?;

    Ok(serde_json::from_slice(&bytes)?)
}
