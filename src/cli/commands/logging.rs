use clap::{builder::ValueParser, Arg, ArgMatches, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_ENV: &str = "env";

/// Output style of the log formatter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Human readable, multi-line events.
    #[default]
    Development,
    /// One JSON object per event.
    Production,
}

impl RuntimeMode {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        match matches.get_one::<String>(ARG_ENV).map(String::as_str) {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ENV)
                .long("env")
                .help("Runtime mode; production switches logs to JSON")
                .env("AUTHGATE_ENV")
                .default_value("development")
                .value_parser(["development", "production"]),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("AUTHGATE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("authgate"))
    }

    #[test]
    fn mode_defaults_to_development() {
        temp_env::with_vars([("AUTHGATE_ENV", None::<&str>)], || {
            let matches = command().get_matches_from(["authgate"]);
            assert_eq!(RuntimeMode::parse(&matches), RuntimeMode::Development);
        });
    }

    #[test]
    fn mode_from_env() {
        temp_env::with_vars([("AUTHGATE_ENV", Some("production"))], || {
            let matches = command().get_matches_from(["authgate"]);
            assert_eq!(RuntimeMode::parse(&matches), RuntimeMode::Production);
        });
    }

    #[test]
    fn mode_rejects_unknown_value() {
        temp_env::with_vars([("AUTHGATE_ENV", None::<&str>)], || {
            let result = command().try_get_matches_from(["authgate", "--env", "staging"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn numeric_log_level() {
        temp_env::with_vars([("AUTHGATE_LOG_LEVEL", Some("3"))], || {
            let matches = command().get_matches_from(["authgate"]);
            assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(3));
        });
    }
}
