//! Core channel adapter trait and delivery types.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{NotifyError, NotifyResult};
use crate::message::Message;

/// Provider a notification is sent through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Email over an SMTP relay
    #[default]
    #[serde(alias = "email")]
    Smtp,
    /// Email through AWS SES
    Ses,
    /// SMS through AWS SNS
    #[serde(alias = "sms")]
    Sns,
    /// Apple Push Notification service
    #[serde(alias = "push")]
    Apns,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 4] = [
        ChannelKind::Smtp,
        ChannelKind::Ses,
        ChannelKind::Sns,
        ChannelKind::Apns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Smtp => "smtp",
            ChannelKind::Ses => "ses",
            ChannelKind::Sns => "sns",
            ChannelKind::Apns => "apns",
        }
    }

    /// What the recipient gets, as used in success messages
    pub fn noun(&self) -> &'static str {
        match self {
            ChannelKind::Smtp | ChannelKind::Ses => "Email",
            ChannelKind::Sns => "SMS",
            ChannelKind::Apns => "Push notification",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "smtp" | "email" => Ok(ChannelKind::Smtp),
            "ses" => Ok(ChannelKind::Ses),
            "sns" | "sms" => Ok(ChannelKind::Sns),
            "apns" | "push" => Ok(ChannelKind::Apns),
            _ => Err(NotifyError::validation(
                "channel.kind",
                format!("Unknown channel '{}'. Valid channels are: smtp, ses, sns, apns", s),
            )),
        }
    }
}

/// Outcome of exactly one send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The provider accepted the message and returned this identifier
    Delivered { message_id: String },
    /// The attempt failed; no retry is made
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    channel: &'static str,
    outcome: DeliveryOutcome,
    elapsed: Duration,
}

impl DeliveryResult {
    pub fn delivered(channel: &'static str, message_id: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            channel,
            outcome: DeliveryOutcome::Delivered {
                message_id: message_id.into(),
            },
            elapsed,
        }
    }

    pub fn failed(channel: &'static str, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            channel,
            outcome: DeliveryOutcome::Failed {
                error: error.into(),
            },
            elapsed,
        }
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }

    pub fn outcome(&self) -> &DeliveryOutcome {
        &self.outcome
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered { .. })
    }

    pub fn message_id(&self) -> Option<&str> {
        match &self.outcome {
            DeliveryOutcome::Delivered { message_id } => Some(message_id),
            DeliveryOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            DeliveryOutcome::Failed { error } => Some(error),
            DeliveryOutcome::Delivered { .. } => None,
        }
    }
}

/// Trait for notification channels (SMTP, SES, SNS, APNs)
///
/// Implementors only provide [`transmit`](ChannelAdapter::transmit); callers
/// use [`send`](ChannelAdapter::send), which never fails.
///
/// # Example Implementation
/// ```ignore
/// #[async_trait]
/// impl ChannelAdapter for SnsAdapter {
///     fn name(&self) -> &'static str {
///         "sns"
///     }
///
///     fn kind(&self) -> ChannelKind {
///         ChannelKind::Sns
///     }
///
///     async fn transmit(&self, message: &Message) -> NotifyResult<String> {
///         // one provider call, returning the provider's message id
///     }
/// }
/// ```
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    fn kind(&self) -> ChannelKind;

    /// Makes one provider call and returns the provider's identifier for the message
    async fn transmit(&self, message: &Message) -> NotifyResult<String>;

    /// Sends `message` once and reports the outcome
    ///
    /// Provider errors become a `Failed` result carrying the error text.
    async fn send(&self, message: &Message) -> DeliveryResult {
        let start = Instant::now();
        let result = self.transmit(message).await;
        let elapsed = start.elapsed();

        match result {
            Ok(message_id) => {
                tracing::info!(
                    channel = self.name(),
                    message_id = %message_id,
                    duration_ms = elapsed.as_millis() as u64,
                    "Notification delivered"
                );
                DeliveryResult::delivered(self.name(), message_id, elapsed)
            }
            Err(e) => {
                tracing::warn!(
                    channel = self.name(),
                    error = %e,
                    duration_ms = elapsed.as_millis() as u64,
                    "Notification delivery failed"
                );
                DeliveryResult::failed(self.name(), e.to_string(), elapsed)
            }
        }
    }
}
