//! Poll command handler
//!
//! Runs the polling invoker until Ctrl+C or SIGTERM.

use std::sync::Arc;

use crate::channels::ProviderConnector;
use crate::config::Settings;
use crate::error::NotifyResult;
use crate::invoker::{DeliveryWindow, PollingInvoker};
use crate::server::shutdown_signal;

pub struct PollCommandHandler {
    config: Settings,
}

impl PollCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Run the polling loop, or only report readiness when `dry_run` is set
    ///
    /// Incomplete channel configuration fails a dry run. A real run logs it
    /// and keeps polling until the values appear.
    pub async fn execute(&self, dry_run: bool) -> NotifyResult<()> {
        if dry_run {
            return self.validate_only();
        }

        let invoker = PollingInvoker::from_settings(&self.config, Arc::new(ProviderConnector))?;

        tokio::select! {
            _ = invoker.run() => {}
            _ = shutdown_signal() => {
                tracing::info!("Polling invoker stopped");
            }
        }

        Ok(())
    }

    fn validate_only(&self) -> NotifyResult<()> {
        let mut out = std::io::stdout();
        super::report_readiness(&self.config, &mut out)?;

        let window = DeliveryWindow::from_schedule(&self.config.schedule);
        println!(
            "✓ Delivery window: {:02}:00-{:02}:00 every {}s",
            window.start_hour(),
            window.end_hour(),
            self.config.schedule.interval_secs
        );
        println!("Dry run completed successfully - polling is ready to start");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_poll_handler_new() {
        let config = Settings::default();
        let handler = PollCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_dry_run_fails_on_incomplete_channel() {
        let mut config = Settings::default();
        config.channel.kind = ChannelKind::Ses;

        let result = PollCommandHandler::new(config).execute(true).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dry_run_passes_on_complete_channel() {
        let mut config = Settings::default();
        config.channel.kind = ChannelKind::Ses;
        config.channel.ses.sender = "alerts@example.com".to_string();
        config.channel.ses.recipient = "me@example.com".to_string();

        let result = PollCommandHandler::new(config).execute(true).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_incomplete_channel_keeps_polling() {
        let mut config = Settings::default();
        config.channel.kind = ChannelKind::Sns;

        let handler = PollCommandHandler::new(config);
        let result = tokio::time::timeout(Duration::from_millis(300), handler.execute(false)).await;

        assert!(result.is_err(), "poll returned instead of sleeping: {:?}", result);
    }
}
