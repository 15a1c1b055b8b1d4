//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::process::ExitCode;

use super::handlers::{
    PollCommandHandler, SendCommandHandler, ServeCommandHandler, TriggerCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::NotifyResult;

/// Execute a CLI command with the given settings
///
/// `send` exits non-zero when the invocation status is not 2xx; `trigger`
/// always exits zero and reports failures on its output.
///
/// # Errors
/// Returns errors from command handlers, e.g. an incomplete channel
/// configuration for `poll` or a failed bind for `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> NotifyResult<ExitCode> {
    match &cli.command {
        Commands::Poll { dry_run, .. } => {
            PollCommandHandler::new(settings).execute(*dry_run).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Send { .. } => {
            let mut out = std::io::stdout();
            let response = SendCommandHandler::new(settings).execute(&mut out).await?;
            Ok(if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Serve {
            host,
            port,
            dry_run,
        } => {
            warn_privileged_bind(host.as_deref(), *port);
            ServeCommandHandler::new(settings).execute(*dry_run).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Trigger => {
            TriggerCommandHandler::new(settings).execute().await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn warn_privileged_bind(host: Option<&str>, port: Option<u16>) {
    if let (Some("0.0.0.0"), Some(port_num)) = (host, port)
        && port_num < 1024
    {
        eprintln!(
            "Warning: Binding to 0.0.0.0 on port {} requires root privileges",
            port_num
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelKind;
    use clap::Parser;

    #[tokio::test]
    async fn test_execute_serve_dry_run() {
        let cli = Cli::try_parse_from(["northstar-notify", "serve", "--dry-run"]).unwrap();
        let mut config = Settings::default();
        config.channel.kind = ChannelKind::Sns;
        config.channel.sns.phone_number = "+12025550123".to_string();

        let result = execute_command(&cli, config).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_execute_poll_dry_run_incomplete() {
        let cli = Cli::try_parse_from(["northstar-notify", "poll", "--dry-run"]).unwrap();
        let mut config = Settings::default();
        config.channel.kind = ChannelKind::Apns;

        let result = execute_command(&cli, config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_execute_send_failure_exit_code() {
        let cli = Cli::try_parse_from(["northstar-notify", "send"]).unwrap();
        let mut config = Settings::default();
        config.channel.kind = ChannelKind::Ses;

        let result = execute_command(&cli, config).await;
        assert_eq!(result.unwrap(), ExitCode::FAILURE);
    }
}
