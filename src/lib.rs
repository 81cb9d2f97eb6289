//! # Authgate (session gateway for a managed identity provider)
//!
//! `authgate` forwards signup, login, logout, token refresh and signup
//! confirmation to an external identity provider (an AWS Cognito user pool)
//! and translates its answers into cookies and JSON.
//!
//! ## Session lifecycle
//!
//! A successful login or refresh yields a [`identity::Session`]. The access
//! token is returned to the caller in the JSON body; the refresh token is
//! stored in the `token` cookie (`HttpOnly`, `Secure`, `SameSite=Strict`).
//!
//! - **Cookie expiry:** `auth_time + 30 days`, where `auth_time` is the claim
//!   from the access token. Refreshing does not extend the window past the
//!   original authentication.
//! - **Logout:** overwrites the cookie with an expired, empty one. The
//!   provider is not contacted, so the refresh token itself stays valid until
//!   it expires at the provider.
//!
//! No password checks, token signature verification or session storage happen
//! here; the provider owns all of that.

pub mod api;
pub mod cli;
pub mod identity;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
