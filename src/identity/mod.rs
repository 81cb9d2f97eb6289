//! Identity provider façade.
//!
//! The gateway talks to the provider only through [`IdentityProvider`]. Every
//! operation returns either a normalized result or a [`ProviderError`] whose
//! message is safe to hand back to the caller verbatim.

pub mod claims;
pub mod cognito;
mod error;
mod session;

use async_trait::async_trait;
use secrecy::SecretString;

pub use cognito::{CognitoClient, CognitoConfig};
pub use error::{normalize_message, ProviderError, UNKNOWN_ERROR};
pub use session::{Credentials, Session, SignupOutcome};

/// Session and token issuance operations of an identity provider.
///
/// Implementations hold no per-request state and are shared across requests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new user with email as username.
    async fn signup(&self, credentials: &Credentials) -> Result<SignupOutcome, ProviderError>;

    /// Exchange email/password for a session.
    async fn authenticate_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, ProviderError>;

    /// Exchange a refresh token for a new session.
    async fn authenticate_with_refresh_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<Session, ProviderError>;

    /// Confirm a pending signup with the emailed verification code.
    async fn confirm_signup(&self, email: &str, code: &str) -> Result<(), ProviderError>;
}
