//! Configuration management module for northstar-notify
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `{environment}.toml` - Environment-specific configuration
//! 3. `local.toml` - Local development overrides (not committed to version control)
//! 4. `NORTHSTAR_*` environment variables
//! 5. Provider variables of existing deployments (`PHONE_NUMBER`, `APNS_KEY_ID`, ...)

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApnsConfig, ApplicationConfig, ChannelSettings, ConsoleSettings, FileSettings,
    LoggerSettings, MessageSettings, ScheduleConfig, ServerConfig, SesConfig, Settings,
    SmtpConfig, SmtpTls, SnsConfig, SourceKind, TriggerConfig,
};
