//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;
use crate::channels::ChannelKind;

/// Notification dispatcher for a daily reading or habit reminder
#[derive(Parser, Debug)]
#[command(name = "northstar-notify")]
#[command(about = "Notification dispatcher for a daily reading or habit reminder")]
#[command(long_about = "
Northstar reads a short message and delivers it through one channel: SMTP
email, Amazon SES, Amazon SNS text message, or an Apple push notification.
It runs either as a long-lived polling loop gated by a daily delivery window,
or once per external trigger.

EXAMPLES:
    # Poll inside the configured delivery window
    northstar-notify poll

    # Poll and send through SES instead of the configured channel
    northstar-notify poll --channel ses

    # Check the channel configuration without sending
    northstar-notify poll --dry-run

    # Send one message now and print the invocation response
    northstar-notify send --channel sns

    # Expose the triggered invoker over HTTP
    northstar-notify serve --host 0.0.0.0 --port 8080

    # Invoke the deployed function once
    northstar-notify trigger

    # Use a specific configuration file with debug logging
    northstar-notify --config /etc/northstar/production.toml --verbose poll

Provider credentials are usually supplied through environment variables
such as NORTHSTAR_CHANNEL__SMTP__PASSWORD, PHONE_NUMBER or APNS_PRIVATE_KEY.
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    ///
    /// Load a single TOML file instead of the layered files under config/.
    /// Environment variable overrides still apply on top of it.
    /// The file must exist and be readable.
    ///
    /// Example: --config /etc/northstar/production.toml
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Picks which `{environment}.toml` layer is loaded, overriding NORTHSTAR_APP_ENV.
    ///
    /// Available values: development (dev), test, staging (stage), production (prod)
    #[arg(short, long, global = true, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging
    ///
    /// Increases log output to debug level. Cannot be used with --quiet.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    ///
    /// Reduces log output to error level only. Cannot be used with --verbose.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send on a fixed interval inside the daily delivery window
    ///
    /// Runs until the process is terminated. Outside the window the loop
    /// sleeps until the window opens on the next calendar day.
    ///
    /// Examples:
    ///   northstar-notify poll                    # Use the configured channel
    ///   northstar-notify poll --channel smtp     # Force SMTP email
    ///   northstar-notify poll --dry-run          # Validate config without sending
    Poll {
        /// Channel override (smtp, ses, sns, apns)
        #[arg(long, value_name = "CHANNEL", value_parser = super::validation::validate_channel)]
        channel: Option<ChannelKind>,

        /// Validate configuration and exit
        ///
        /// Reports missing channel values and the delivery window without
        /// contacting any provider.
        #[arg(long)]
        dry_run: bool,
    },

    /// Run one triggered invocation and print its response
    ///
    /// Prints the `{statusCode, body}` response as JSON. The exit code is
    /// non-zero when the status code is not 2xx.
    ///
    /// Examples:
    ///   northstar-notify send                    # Use the configured channel
    ///   northstar-notify send --channel apns     # Send a push notification
    Send {
        /// Channel override (smtp, ses, sns, apns)
        #[arg(long, value_name = "CHANNEL", value_parser = super::validation::validate_channel)]
        channel: Option<ChannelKind>,
    },

    /// Serve the triggered invoker over HTTP
    ///
    /// `POST /invoke` runs one invocation, `GET /health` reports liveness.
    ///
    /// Examples:
    ///   northstar-notify serve                            # Start with defaults
    ///   northstar-notify serve --host 0.0.0.0 --port 8080 # Bind to all interfaces
    ///   northstar-notify serve --dry-run                  # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Must be a valid IPv4 address, hostname, or 'localhost'.
        ///
        /// Default: 127.0.0.1
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on
        ///
        /// Must be between 1 and 65535.
        ///
        /// Default: 3000
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Invoke the deployed triggered invoker once
    ///
    /// Uses `trigger.function_name` and `trigger.region`. Always exits with
    /// status 0; failures are reported on the output.
    Trigger,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl Commands {
    /// Channel override carried by the command, if any
    pub fn channel(&self) -> Option<ChannelKind> {
        match self {
            Commands::Poll { channel, .. } | Commands::Send { channel } => *channel,
            Commands::Serve { .. } | Commands::Trigger => None,
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["northstar-notify", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["northstar-notify", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_subcommand_is_required() {
        let result = Cli::try_parse_from(["northstar-notify"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_poll_command() {
        let cli =
            Cli::try_parse_from(["northstar-notify", "poll", "--channel", "sms", "--dry-run"])
                .unwrap();
        match cli.command {
            Commands::Poll { channel, dry_run } => {
                assert_eq!(channel, Some(ChannelKind::Sns));
                assert!(dry_run);
            }
            other => panic!("Expected Poll command, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_channel_rejected() {
        let result = Cli::try_parse_from(["northstar-notify", "send", "--channel", "fax"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "northstar-notify",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve {
                host,
                port,
                dry_run,
            } => {
                assert_eq!(host, Some("0.0.0.0".to_string()));
                assert_eq!(port, Some(8080));
                assert!(!dry_run);
            }
            other => panic!("Expected Serve command, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["northstar-notify", "trigger", "--verbose", "--env", "prod"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Trigger));
        assert!(cli.verbose);
        assert_eq!(cli.env, Some(Environment::Production));
        assert_eq!(cli.command.channel(), None);
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let result = Cli::try_parse_from(["northstar-notify", "--verbose", "--quiet", "poll"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_environment_conversion() {
        let env: crate::config::Environment = Environment::Staging.into();
        assert_eq!(env, crate::config::Environment::Staging);
    }
}
