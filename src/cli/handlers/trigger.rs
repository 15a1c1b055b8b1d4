//! Trigger command handler
//!
//! Invokes the deployed function once. Failures are printed, never returned
//! as an error exit.

use crate::config::Settings;
use crate::error::{NotifyError, NotifyResult};
use crate::trigger::{LambdaFunctionInvoker, Trigger, TriggerReport};

pub struct TriggerCommandHandler {
    config: Settings,
}

impl TriggerCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> NotifyResult<TriggerReport> {
        let trigger_config = self.config.trigger.clone();
        let invoker = LambdaFunctionInvoker::connect(&trigger_config.region).await;
        let trigger = Trigger::new(invoker, trigger_config);

        let mut out = std::io::stdout();
        trigger
            .run(&mut out)
            .await
            .map_err(|e| NotifyError::from(anyhow::Error::from(e)))
    }
}
