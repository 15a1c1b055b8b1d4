use std::path::PathBuf;

use thiserror::Error;

use crate::config::error::ConfigError;

/// Errors raised while fetching, dispatching, or reporting a notification.
///
/// Every variant is handled inside a single invocation: the polling loop logs
/// it and keeps running, the triggered invoker turns it into a structured
/// status response.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// One or more required configuration values are absent
    #[error("Missing required configuration: {}", keys.join(", "))]
    ConfigurationMissing { keys: Vec<String> },

    /// The message file could not be read
    #[error("Message source unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network, authentication, or API-level failure reported by a provider
    #[error("{provider} delivery failed: {message}")]
    ProviderFailure { provider: String, message: String },

    /// A configuration value is present but malformed
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Anything else
    #[error("Unexpected error: {source}")]
    Unexpected {
        #[source]
        source: anyhow::Error,
    },
}

impl NotifyError {
    /// Create a missing-configuration error from a list of dotted keys
    pub fn missing<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NotifyError::ConfigurationMissing {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a provider failure
    pub fn provider(provider: impl Into<String>, message: impl ToString) -> Self {
        NotifyError::ProviderFailure {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        NotifyError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the invocation was never attempted because
    /// the configuration is incomplete or malformed
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NotifyError::ConfigurationMissing { .. } | NotifyError::Validation { .. }
        )
    }
}

impl From<anyhow::Error> for NotifyError {
    fn from(error: anyhow::Error) -> Self {
        NotifyError::Unexpected { source: error }
    }
}

impl From<ConfigError> for NotifyError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::ValidationError { field, message } => NotifyError::Validation {
                field,
                reason: message,
            },
            other => NotifyError::Unexpected {
                source: anyhow::Error::from(other),
            },
        }
    }
}

/// Type alias for Result with NotifyError to simplify function signatures
pub type NotifyResult<T> = Result<T, NotifyError>;
