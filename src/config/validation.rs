//! Configuration validation logic
//!
//! Structural checks run when settings are loaded. Presence of provider
//! credentials is checked separately, per invocation, through
//! [`ChannelSettings::missing_fields`], so an incomplete deployment is
//! reported as a failed invocation instead of refusing to start.

use crate::channels::ChannelKind;
use crate::config::error::ConfigError;
use crate::message::MissingSourcePolicy;
use crate::config::settings::{
    ChannelSettings, FileSettings, LoggerSettings, MessageSettings, ScheduleConfig, ServerConfig,
    Settings, SourceKind, TriggerConfig,
};

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation("server.host", "Host cannot be empty."));
        }

        Ok(())
    }
}

impl ScheduleConfig {
    /// Validate schedule configuration
    ///
    /// # Validation Rules
    /// - Hours must be between 0 and 24
    /// - The window must start before it ends (no wrap past midnight)
    /// - The interval must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_hour > 23 {
            return Err(ConfigError::validation(
                "schedule.start_hour",
                "Start hour must be between 0 and 23.",
            ));
        }

        if self.end_hour > 24 {
            return Err(ConfigError::validation(
                "schedule.end_hour",
                "End hour must be between 1 and 24.",
            ));
        }

        if self.start_hour >= self.end_hour {
            return Err(ConfigError::ValidationError {
                field: "schedule".to_string(),
                message: format!(
                    "Delivery window must start before it ends (start_hour {} >= end_hour {}).",
                    self.start_hour, self.end_hour
                ),
            });
        }

        if self.interval_secs == 0 {
            return Err(ConfigError::validation(
                "schedule.interval_secs",
                "Interval must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl MessageSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.source {
            SourceKind::File if self.path.trim().is_empty() => Err(ConfigError::validation(
                "message.path",
                "Message path is required for the file source.",
            )),
            SourceKind::Constant if self.text.as_deref().is_none_or(|t| t.trim().is_empty()) => {
                Err(ConfigError::validation(
                    "message.text",
                    "Message text is required for the constant source.",
                ))
            }
            SourceKind::File
                if self.on_missing == MissingSourcePolicy::Fallback
                    && self.fallback_text.trim().is_empty() =>
            {
                Err(ConfigError::validation(
                    "message.fallback_text",
                    "Fallback text cannot be empty when on_missing is \"fallback\".",
                ))
            }
            _ => Ok(()),
        }
    }
}

impl TriggerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.function_name.trim().is_empty() {
            return Err(ConfigError::validation(
                "trigger.function_name",
                "Function name cannot be empty.",
            ));
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::validation("trigger.region", "Region cannot be empty."));
        }
        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level.trim().is_empty() {
            return Err(ConfigError::validation("logger.level", "Log level cannot be empty."));
        }

        if !VALID_LOG_FORMATS.contains(&self.console.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.console.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.console.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl ChannelSettings {
    /// Dotted keys of required values that are empty for the active channel
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        let mut require = |key: &str, value: &str| {
            if value.trim().is_empty() {
                missing.push(format!("channel.{}.{}", self.kind.as_str(), key));
            }
        };

        match self.kind {
            ChannelKind::Smtp => {
                require("host", &self.smtp.host);
                require("sender", &self.smtp.sender);
                require("password", &self.smtp.password);
                require("recipient", &self.smtp.recipient);
            }
            ChannelKind::Ses => {
                require("sender", &self.ses.sender);
                require("recipient", &self.ses.recipient);
            }
            ChannelKind::Sns => {
                require("phone_number", &self.sns.phone_number);
            }
            ChannelKind::Apns => {
                require("key_id", &self.apns.key_id);
                require("team_id", &self.apns.team_id);
                require("bundle_id", &self.apns.bundle_id);
                if !self.apns.has_private_key() {
                    require("private_key", "");
                }
                require("device_token", &self.apns.device_token);
            }
        }

        missing
    }
}

impl Settings {
    /// Validate the structure of the complete configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.message.validate()?;
        self.schedule.validate()?;
        self.trigger.validate()?;
        Ok(())
    }
}
