//! Refresh token cookie.
//!
//! The refresh token lives in the `token` cookie. Its expiry is anchored to the
//! access token's `auth_time` claim, so refreshing never pushes it past 30 days
//! from the original login.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::{DateTime, Duration, Utc};

use super::state::AuthConfig;

const REFRESH_COOKIE_NAME: &str = "token";

/// 30 days.
const REFRESH_COOKIE_TTL_MS: i64 = 1000 * 60 * 60 * 24 * 30;

/// Expiry of the refresh cookie for a session authenticated at `auth_time`.
#[must_use]
pub(super) fn refresh_cookie_expiry(auth_time: DateTime<Utc>) -> Option<DateTime<Utc>> {
    auth_time.checked_add_signed(Duration::milliseconds(REFRESH_COOKIE_TTL_MS))
}

/// Build the `Set-Cookie` value carrying the refresh token.
pub(super) fn refresh_cookie(
    config: &AuthConfig,
    token: &str,
    expires: DateTime<Utc>,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&cookie_string(config, token, expires))
}

/// Build a `Set-Cookie` value that overwrites the refresh token with an empty,
/// already expired one.
pub(super) fn clear_refresh_cookie(
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&cookie_string(config, "", now))
}

fn cookie_string(config: &AuthConfig, value: &str, expires: DateTime<Utc>) -> String {
    let mut cookie = format!("{REFRESH_COOKIE_NAME}={value}");
    if let Some(domain) = config.cookie_domain() {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    cookie.push_str("; Path=/; Expires=");
    cookie.push_str(&http_date(expires));
    cookie.push_str("; HttpOnly; Secure; SameSite=Strict");
    cookie
}

/// IMF-fixdate, e.g. `Thu, 14 Dec 2023 21:56:40 GMT`.
fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Read the refresh token from the request cookies. Empty values count as absent.
pub(super) fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == REFRESH_COOKIE_NAME {
                let val = val.trim().trim_matches('"');
                return (!val.is_empty()).then(|| val.to_string());
            }
        }
    }
    None
}
