//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod poll;
pub mod send;
pub mod serve;
pub mod trigger;

pub use poll::PollCommandHandler;
pub use send::SendCommandHandler;
pub use serve::ServeCommandHandler;
pub use trigger::TriggerCommandHandler;

use std::io::{self, Write};

use crate::config::{Settings, SourceKind};
use crate::error::{NotifyError, NotifyResult};

/// Print the dry-run report for the active channel and message source
///
/// Fails with `ConfigurationMissing` when the channel lacks required values.
pub(crate) fn report_readiness<W: Write>(settings: &Settings, out: &mut W) -> NotifyResult<()> {
    settings.validate()?;
    write_readiness(settings, out).map_err(|e| NotifyError::from(anyhow::Error::from(e)))?;

    let missing = settings.channel.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(NotifyError::missing(missing))
    }
}

fn write_readiness<W: Write>(settings: &Settings, out: &mut W) -> io::Result<()> {
    writeln!(out, "✓ Configuration is valid")?;
    writeln!(out, "✓ Channel: {}", settings.channel.kind)?;

    match settings.message.source {
        SourceKind::File => writeln!(
            out,
            "✓ Message file: {}",
            settings.message.resolved_path().display()
        )?,
        SourceKind::Constant => writeln!(out, "✓ Message source: constant text")?,
    }

    let missing = settings.channel.missing_fields();
    if missing.is_empty() {
        writeln!(out, "✓ Channel configuration is complete")?;
    } else {
        for key in &missing {
            writeln!(out, "✗ Missing: {}", key)?;
        }
    }

    Ok(())
}
