use crate::{
    api::{self, AuthConfig, AuthState},
    identity::{CognitoClient, CognitoConfig},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub cognito_user_pool_id: String,
    pub cognito_client_id: String,
    pub cognito_endpoint: Option<String>,
    pub cookie_domain: Option<String>,
    pub origin: String,
}

/// Build the provider client from the arguments.
///
/// # Errors
/// Returns an error if the endpoint can't be derived or the HTTP client can't be built.
pub fn cognito_client(args: &Args) -> Result<CognitoClient> {
    let mut config = CognitoConfig::new(
        args.cognito_user_pool_id.clone(),
        args.cognito_client_id.clone(),
    );
    if let Some(endpoint) = &args.cognito_endpoint {
        config = config.with_endpoint(endpoint.clone());
    }

    CognitoClient::new(&config).context("Failed to configure Cognito client")
}

/// Execute the server action.
/// # Errors
/// Returns an error if the provider client can't be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let client = cognito_client(&args)?;
    info!(
        user_pool_id = %args.cognito_user_pool_id,
        cookie_domain = ?args.cookie_domain,
        "Starting {}",
        crate::APP_USER_AGENT
    );

    let auth_config = AuthConfig::new().with_cookie_domain(args.cookie_domain);
    let auth_state = Arc::new(AuthState::new(auth_config, Arc::new(client)));

    api::new(args.port, &args.origin, auth_state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pool: &str, endpoint: Option<&str>) -> Args {
        Args {
            port: 0,
            cognito_user_pool_id: pool.to_string(),
            cognito_client_id: "client-id".to_string(),
            cognito_endpoint: endpoint.map(ToString::to_string),
            cookie_domain: None,
            origin: "*".to_string(),
        }
    }

    #[test]
    fn client_from_pool_region() {
        assert!(cognito_client(&args("eu-central-1_AbC", None)).is_ok());
    }

    #[test]
    fn client_with_endpoint_override() {
        assert!(cognito_client(&args("local", Some("http://localhost:9229/"))).is_ok());
    }

    #[test]
    fn client_rejects_bad_pool_id() {
        assert!(cognito_client(&args("no-region", None)).is_err());
    }
}
