//! Send command handler
//!
//! Runs one triggered invocation locally and prints the response object.

use std::io::Write;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::{NotifyError, NotifyResult};
use crate::invoker::{InvocationResponse, TriggeredInvoker};

pub struct SendCommandHandler {
    invoker: TriggeredInvoker,
}

impl SendCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self {
            invoker: TriggeredInvoker::new(Arc::new(config)),
        }
    }

    /// Invoke once and write the pretty-printed response to `out`
    pub async fn execute<W: Write>(&self, out: &mut W) -> NotifyResult<InvocationResponse> {
        let response = self.invoker.invoke().await;

        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| NotifyError::from(anyhow::Error::from(e)))?;
        writeln!(out, "{}", json).map_err(|e| NotifyError::from(anyhow::Error::from(e)))?;

        Ok(response)
    }
}
