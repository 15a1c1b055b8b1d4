//! SMTP email adapter.
//!
//! Submits a plain-text mail through a STARTTLS relay (Gmail by default)
//! with a static username/password login. `tls = "none"` talks plain SMTP,
//! for local relays only.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use super::adapter::{ChannelAdapter, ChannelKind};
use crate::config::{SmtpConfig, SmtpTls};
use crate::error::{NotifyError, NotifyResult};
use crate::message::Message;

pub struct SmtpAdapter {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
    ascii_only: bool,
}

impl SmtpAdapter {
    /// Builds the relay transport; no connection is made until the first send
    ///
    /// Must be called inside a Tokio runtime (the connection pool spawns its
    /// reaper task).
    pub fn new(config: &SmtpConfig) -> NotifyResult<Self> {
        let sender = parse_mailbox("channel.smtp.sender", &config.sender)?;
        let recipient = parse_mailbox("channel.smtp.recipient", &config.recipient)?;

        let builder = match config.tls {
            SmtpTls::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| NotifyError::validation("channel.smtp.host", e.to_string()))?,
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.login().to_string(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
            ascii_only: config.ascii_only,
        })
    }

    fn build_email(&self, message: &Message) -> NotifyResult<lettre::Message> {
        let message = if self.ascii_only {
            message.to_ascii()
        } else {
            message.clone()
        };

        lettre::Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(message.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body().to_string())
            .map_err(|e| NotifyError::provider("smtp", e))
    }
}

fn parse_mailbox(field: &str, value: &str) -> NotifyResult<Mailbox> {
    value
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::validation(field, format!("Invalid address '{}': {}", value, e)))
}

#[async_trait]
impl ChannelAdapter for SmtpAdapter {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Smtp
    }

    /// Success is "the relay accepted the mail"; the identifier is the
    /// server's reply text, or the reply code when the text is empty
    async fn transmit(&self, message: &Message) -> NotifyResult<String> {
        let email = self.build_email(message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| NotifyError::provider("smtp", e))?;

        let reply = response.message().collect::<Vec<_>>().join(" ");
        if reply.trim().is_empty() {
            Ok(response.code().to_string())
        } else {
            Ok(reply)
        }
    }
}
