use clap::{Arg, ArgMatches, Command};

pub const ARG_COGNITO_USER_POOL_ID: &str = "cognito-user-pool-id";
pub const ARG_COGNITO_CLIENT_ID: &str = "cognito-client-id";
pub const ARG_COGNITO_ENDPOINT: &str = "cognito-endpoint";

#[derive(Debug)]
pub struct Options {
    pub user_pool_id: String,
    pub client_id: String,
    pub endpoint: Option<String>,
}

impl Options {
    /// Parse Cognito arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_required = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            user_pool_id: read_required(ARG_COGNITO_USER_POOL_ID)?,
            client_id: read_required(ARG_COGNITO_CLIENT_ID)?,
            endpoint: matches
                .get_one::<String>(ARG_COGNITO_ENDPOINT)
                .cloned()
                .filter(|v| !v.trim().is_empty()),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COGNITO_USER_POOL_ID)
                .long(ARG_COGNITO_USER_POOL_ID)
                .help("Cognito user pool id, example: eu-central-1_AbCdEf123")
                .env("AUTHGATE_COGNITO_USER_POOL_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_COGNITO_CLIENT_ID)
                .long(ARG_COGNITO_CLIENT_ID)
                .help("Cognito app client id (no client secret)")
                .env("AUTHGATE_COGNITO_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_COGNITO_ENDPOINT)
                .long(ARG_COGNITO_ENDPOINT)
                .help("Override the Cognito endpoint (default: derived from the pool region)")
                .env("AUTHGATE_COGNITO_ENDPOINT"),
        )
}
