//! AWS Cognito user pool client.
//!
//! Uses the public Cognito Identity Provider JSON API. `SignUp`,
//! `InitiateAuth` and `ConfirmSignUp` are unauthenticated calls for app clients
//! without a secret, so no request signing is involved.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{header::CONTENT_TYPE, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{Credentials, IdentityProvider, ProviderError, Session, SignupOutcome};
use crate::APP_USER_AGENT;

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

#[derive(Clone, Debug)]
pub struct CognitoConfig {
    user_pool_id: String,
    client_id: String,
    endpoint: Option<String>,
}

impl CognitoConfig {
    #[must_use]
    pub fn new(user_pool_id: String, client_id: String) -> Self {
        Self {
            user_pool_id,
            client_id,
            endpoint: None,
        }
    }

    /// Override the regional endpoint (local emulators, tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    #[must_use]
    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Region encoded in the pool id, `eu-central-1_AbC` -> `eu-central-1`.
    ///
    /// # Errors
    /// Returns an error if the pool id has no `<region>_<id>` shape.
    pub fn region(&self) -> Result<&str> {
        let re = Regex::new(r"^([a-z]{2}(?:-[a-z]+)+-\d+)_[0-9A-Za-z]+$")?;
        re.captures(&self.user_pool_id)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| anyhow!("Invalid Cognito user pool id: {}", self.user_pool_id))
    }

    /// Endpoint all calls are posted to.
    ///
    /// # Errors
    /// Returns an error if the override is not a URL or the region can't be derived.
    pub fn endpoint(&self) -> Result<Url> {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://cognito-idp.{}.amazonaws.com/", self.region()?),
        };
        Url::parse(&endpoint).with_context(|| format!("Invalid Cognito endpoint: {endpoint}"))
    }
}

/// [`IdentityProvider`] backed by a Cognito user pool.
#[derive(Clone, Debug)]
pub struct CognitoClient {
    client: Client,
    endpoint: Url,
    client_id: String,
}

impl CognitoClient {
    /// Build the client once at startup; it is reused for every request.
    ///
    /// # Errors
    /// Returns an error if the endpoint is invalid or the HTTP client can't be built.
    pub fn new(config: &CognitoConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        debug!("Cognito endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            client_id: config.client_id().to_string(),
        })
    }

    /// Post one API call and return the raw success body.
    async fn send(&self, operation: &str, body: &Value) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .body(body.to_string())
            .send()
            .await
            .map_err(|err| {
                warn!(operation, "Cognito request failed: {}", err);
                ProviderError::from(err)
            })?;

        let status = response.status();
        let bytes = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(bytes);
        }

        let payload: Option<Value> = serde_json::from_slice(&bytes).ok();
        let err = ProviderError::from_value(payload.as_ref());
        warn!(
            operation,
            status = status.as_u16(),
            kind = err.kind().unwrap_or("unknown"),
            "Cognito rejected request"
        );
        Err(err)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        body: &Value,
    ) -> Result<T, ProviderError> {
        let bytes = self.send(operation, body).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ProviderError::new(format!("invalid {operation} response: {err}")))
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SignUpResponse {
    user_sub: String,
    #[serde(default)]
    user_confirmed: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    access_token: String,
    id_token: String,
    refresh_token: Option<String>,
}

// Debug without the tokens.
impl std::fmt::Debug for AuthenticationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationResult")
            .field("refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Turn an `InitiateAuth` answer into a session.
///
/// Refresh responses usually omit `RefreshToken`; the presented one stays valid
/// and is carried into the new session.
fn session_from_auth(
    response: InitiateAuthResponse,
    presented_refresh_token: Option<&SecretString>,
) -> Result<Session, ProviderError> {
    let Some(result) = response.authentication_result else {
        return Err(match response.challenge_name {
            Some(name) => ProviderError::new(format!("authentication challenge required: {name}")),
            None => ProviderError::new("missing authentication result"),
        });
    };

    let refresh_token = match (result.refresh_token, presented_refresh_token) {
        (Some(token), _) => SecretString::from(token),
        (None, Some(presented)) => presented.clone(),
        (None, None) => return Err(ProviderError::new("missing refresh token")),
    };

    Session::from_tokens(result.access_token, &result.id_token, refresh_token)
}

#[async_trait]
impl IdentityProvider for CognitoClient {
    #[instrument(skip_all)]
    async fn signup(&self, credentials: &Credentials) -> Result<SignupOutcome, ProviderError> {
        let body = json!({
            "ClientId": self.client_id,
            "Username": credentials.email,
            "Password": credentials.password.expose_secret(),
            "UserAttributes": [{ "Name": "email", "Value": credentials.email }],
        });

        let response: SignUpResponse = self.call("SignUp", &body).await?;

        Ok(SignupOutcome {
            username: credentials.email.clone(),
            user_sub: response.user_sub,
            user_confirmed: response.user_confirmed,
        })
    }

    #[instrument(skip_all)]
    async fn authenticate_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, ProviderError> {
        let body = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": self.client_id,
            "AuthParameters": {
                "USERNAME": credentials.email,
                "PASSWORD": credentials.password.expose_secret(),
            },
        });

        let response: InitiateAuthResponse = self.call("InitiateAuth", &body).await?;
        session_from_auth(response, None)
    }

    #[instrument(skip_all)]
    async fn authenticate_with_refresh_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<Session, ProviderError> {
        let body = json!({
            "AuthFlow": "REFRESH_TOKEN_AUTH",
            "ClientId": self.client_id,
            "AuthParameters": { "REFRESH_TOKEN": refresh_token.expose_secret() },
        });

        let response: InitiateAuthResponse = self.call("InitiateAuth", &body).await?;
        session_from_auth(response, Some(refresh_token))
    }

    #[instrument(skip_all)]
    async fn confirm_signup(&self, email: &str, code: &str) -> Result<(), ProviderError> {
        let body = json!({
            "ClientId": self.client_id,
            "Username": email,
            "ConfirmationCode": code,
            "ForceAliasCreation": true,
        });

        self.send("ConfirmSignUp", &body).await?;
        Ok(())
    }
}
