//! Function host for the triggered invoker.
//!
//! Settings are loaded once per container; each event is one invocation and
//! the `{statusCode, body}` object is the function's return value. The event
//! payload itself is ignored.

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;

use northstar_notify::config::{ConfigLoader, LoggerSettings, Settings};
use northstar_notify::invoker::{InvocationResponse, TriggeredInvoker};
use northstar_notify::logger::{LogFormat, init_logger};

/// Set by the function runtime to the directory holding the deployment package
const TASK_ROOT_ENV: &str = "LAMBDA_TASK_ROOT";

type HostState = Result<TriggeredInvoker, String>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = load_settings();

    let logger = settings
        .as_ref()
        .map(|s| s.logger.clone())
        .unwrap_or_default();
    if let Err(e) = init_json_logger(logger) {
        eprintln!("Logger initialization error: {:#}", e);
    }

    let state: Arc<HostState> = Arc::new(match settings {
        Ok(settings) => {
            tracing::info!(
                channel = %settings.channel.kind,
                version = northstar_notify::pkg_version(),
                "Function host ready"
            );
            Ok(TriggeredInvoker::new(Arc::new(settings)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Configuration could not be loaded");
            Err(e)
        }
    });

    run(service_fn(move |event: LambdaEvent<Value>| {
        let state = state.clone();
        async move { handle(&state, event).await }
    }))
    .await
}

async fn handle(state: &HostState, event: LambdaEvent<Value>) -> Result<InvocationResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Event received");

    Ok(match state {
        Ok(invoker) => invoker.invoke().await,
        Err(e) => InvocationResponse::bad_request(e.clone()),
    })
}

/// File layers are optional here; deployments configure through environment
/// variables. Relative message paths resolve against the package root.
fn load_settings() -> Result<Settings, String> {
    let mut settings = ConfigLoader::new()
        .and_then(|loader| loader.load_or_defaults())
        .map_err(|e| e.to_string())?;

    if settings.message.base_dir.is_none()
        && let Ok(root) = std::env::var(TASK_ROOT_ENV)
    {
        settings.message.base_dir = Some(root);
    }

    Ok(settings)
}

/// Console-only JSON logging; the runtime collects stdout
fn init_json_logger(settings: LoggerSettings) -> anyhow::Result<()> {
    let mut config = settings.into_logger_config()?;
    config.console.enabled = true;
    config.console.colored = false;
    config.console.format = LogFormat::Json;
    config.file.enabled = false;
    init_logger(config)
}
