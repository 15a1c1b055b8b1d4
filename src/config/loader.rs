//! Configuration loader for northstar-notify
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
pub(crate) const CONFIG_DIR_ENV: &str = "NORTHSTAR_CONFIG_DIR";

/// Environment variable for specific configuration file
pub(crate) const CONFIG_FILE_ENV: &str = "NORTHSTAR_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "NORTHSTAR";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Provider variables used by existing function deployments, mapped onto
/// their configuration keys
const PROVIDER_ENV_KEYS: &[(&str, &str)] = &[
    ("EMAIL_ADDRESS", "channel.ses.recipient"),
    ("FROM_EMAIL", "channel.ses.sender"),
    ("PHONE_NUMBER", "channel.sns.phone_number"),
    ("APNS_KEY_ID", "channel.apns.key_id"),
    ("APNS_TEAM_ID", "channel.apns.team_id"),
    ("APNS_BUNDLE_ID", "channel.apns.bundle_id"),
    ("APNS_PRIVATE_KEY", "channel.apns.private_key"),
    ("DEVICE_TOKEN", "channel.apns.device_token"),
];

/// Configuration loader that handles layered configuration loading
///
/// Sources, lowest priority first:
/// 1. `default.toml` (required unless loading with defaults)
/// 2. `{environment}.toml`
/// 3. `local.toml`
/// 4. `NORTHSTAR_*` environment variables
/// 5. provider variables (`PHONE_NUMBER`, `APNS_KEY_ID`, ...)
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if both `NORTHSTAR_CONFIG_DIR` and `NORTHSTAR_CONFIG_FILE`
    /// are set, as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && std::env::var(CONFIG_DIR_ENV).is_ok() {
            return Err(ConfigError::mutual_exclusivity(
                "NORTHSTAR_CONFIG_DIR and NORTHSTAR_CONFIG_FILE cannot both be set. \
                 Use NORTHSTAR_CONFIG_DIR for layered configuration or \
                 NORTHSTAR_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir,
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loader for a single explicit file, bypassing the process environment
    /// lookup of the file location
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Override the environment layer picked from `NORTHSTAR_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if `default.toml` is missing in layered mode, if
    /// parsing fails, or if the result fails structural validation.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        self.load_with(true)
    }

    /// Load configuration, treating every file layer as optional
    ///
    /// Used by hosts (the Lambda binary) that are usually configured through
    /// environment variables alone.
    pub fn load_or_defaults(&self) -> Result<Settings, ConfigError> {
        self.load_with(false)
    }

    fn load_with(&self, require_default: bool) -> Result<Settings, ConfigError> {
        let config = self.build_config(require_default)?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self, require_default: bool) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            self.build_layered_config(builder, require_default)?
        };

        let builder = Self::add_env_source(builder);
        let builder = Self::add_provider_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
        require_default: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, require_default)?;

        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let builder = Self::add_file_source(builder, &env_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    /// `NORTHSTAR_CHANNEL__APNS__KEY_ID` -> `channel.apns.key_id`
    ///
    /// Values are kept as strings so phone numbers keep their leading `+`;
    /// numeric and boolean fields are converted during deserialization.
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true),
        )
    }

    fn add_provider_overrides(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        PROVIDER_ENV_KEYS
            .iter()
            .try_fold(builder, |builder, (var, key)| {
                let value = std::env::var(var).ok().filter(|v| !v.is_empty());
                builder.set_override_option(*key, value)
            })
            .map_err(ConfigError::from)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}
