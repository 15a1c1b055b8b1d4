//! Out-of-band trigger for a deployed triggered invoker.
//!
//! Invokes the remote function synchronously with an empty JSON payload and
//! prints what came back. Failures are reported on the output, never as an
//! error exit.

use std::io::{self, Write};

use async_trait::async_trait;
use aws_sdk_lambda::Client;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use serde_json::Value;

use crate::config::TriggerConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::external::aws::load_sdk_config;

/// Raw result of a synchronous function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionResponse {
    /// Transport-level status (200 for a completed synchronous call)
    pub status_code: i32,
    pub payload: Vec<u8>,
    /// Set when the function itself raised
    pub function_error: Option<String>,
}

/// Calls a remote function and waits for its response
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn invoke(&self, function_name: &str, payload: &[u8]) -> NotifyResult<FunctionResponse>;
}

/// AWS Lambda `Invoke` with `RequestResponse`
pub struct LambdaFunctionInvoker {
    client: Client,
}

impl LambdaFunctionInvoker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(region: &str) -> Self {
        let sdk_config = load_sdk_config(Some(region)).await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl FunctionInvoker for LambdaFunctionInvoker {
    async fn invoke(&self, function_name: &str, payload: &[u8]) -> NotifyResult<FunctionResponse> {
        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload.to_vec()))
            .send()
            .await
            .map_err(|e| NotifyError::provider("lambda", DisplayErrorContext(&e)))?;

        Ok(FunctionResponse {
            status_code: output.status_code(),
            payload: output
                .payload()
                .map(|blob| blob.as_ref().to_vec())
                .unwrap_or_default(),
            function_error: output.function_error().map(str::to_string),
        })
    }
}

/// What the trigger observed
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerReport {
    pub transport_status: Option<i32>,
    pub payload: Option<Value>,
    pub succeeded: bool,
}

pub struct Trigger<F> {
    invoker: F,
    config: TriggerConfig,
}

impl<F: FunctionInvoker> Trigger<F> {
    pub fn new(invoker: F, config: TriggerConfig) -> Self {
        Self { invoker, config }
    }

    /// Invoke the function and print status, payload, and verdict to `out`
    pub async fn run<W: Write>(&self, out: &mut W) -> io::Result<TriggerReport> {
        let function = &self.config.function_name;
        writeln!(out, "Triggering {} in {}...", function, self.config.region)?;

        let response = match self.invoker.invoke(function, b"{}").await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(function = %function, error = %e, "Function invocation failed");
                writeln!(out, "❌ Error invoking {}: {}", function, e)?;
                return Ok(TriggerReport {
                    transport_status: None,
                    payload: None,
                    succeeded: false,
                });
            }
        };

        writeln!(out, "Status Code: {}", response.status_code)?;

        let payload = serde_json::from_slice::<Value>(&response.payload).ok();
        match &payload {
            Some(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
                writeln!(out, "Response: {}", pretty)?;
            }
            None => writeln!(out, "Response: {}", String::from_utf8_lossy(&response.payload))?,
        }

        let status = payload
            .as_ref()
            .and_then(|v| v.get("statusCode"))
            .and_then(Value::as_i64)
            .unwrap_or(i64::from(response.status_code));
        let succeeded = response.function_error.is_none() && status == 200;

        if succeeded {
            writeln!(out, "✅ Notification sent successfully!")?;
        } else if let Some(error) = &response.function_error {
            writeln!(out, "❌ Function error: {}", error)?;
        } else {
            writeln!(out, "❌ Failed to send notification. Status: {}", status)?;
        }

        Ok(TriggerReport {
            transport_status: Some(response.status_code),
            payload,
            succeeded,
        })
    }
}
