//! Map validated CLI arguments to the action the binary runs.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, cognito, ARG_PORT};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or empty.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(42001);

    let cognito_opts = cognito::Options::parse(matches)?;
    let auth_opts = auth::Options::parse(matches);

    Ok(Action::Server(Args {
        port,
        cognito_user_pool_id: cognito_opts.user_pool_id,
        cognito_client_id: cognito_opts.client_id,
        cognito_endpoint: cognito_opts.endpoint,
        cookie_domain: auth_opts.cookie_domain,
        origin: auth_opts.origin,
    }))
}
