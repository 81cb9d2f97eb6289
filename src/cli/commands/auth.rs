use clap::{Arg, ArgMatches, Command};

pub const ARG_COOKIE_DOMAIN: &str = "cookie-domain";
pub const ARG_ORIGIN: &str = "origin";

#[derive(Debug)]
pub struct Options {
    pub cookie_domain: Option<String>,
    pub origin: String,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            cookie_domain: matches
                .get_one::<String>(ARG_COOKIE_DOMAIN)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            origin: matches
                .get_one::<String>(ARG_ORIGIN)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "*".to_string()),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_COOKIE_DOMAIN)
                .long(ARG_COOKIE_DOMAIN)
                .help("Domain attribute of the refresh cookie (default: host-only)")
                .env("AUTHGATE_COOKIE_DOMAIN"),
        )
        .arg(
            Arg::new(ARG_ORIGIN)
                .long(ARG_ORIGIN)
                .help("Allowed CORS origin, `*` mirrors the request origin")
                .env("AUTHGATE_ORIGIN")
                .default_value("*"),
        )
}
