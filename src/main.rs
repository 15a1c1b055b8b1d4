use std::process::ExitCode;

use clap::Parser;
use northstar_notify::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = northstar_notify::pkg_version(),
        channel = %settings.channel.kind,
        "Configuration loaded"
    );

    Ok(execute_command(&cli, settings).await?)
}
