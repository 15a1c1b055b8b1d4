//! AWS SES email adapter.

use async_trait::async_trait;
use aws_sdk_ses::Client;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::types::{Body, Content, Destination, Message as SesMessage};

use super::adapter::{ChannelAdapter, ChannelKind};
use crate::config::SesConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::external::aws::load_sdk_config;
use crate::message::Message;

const CHARSET: &str = "UTF-8";

pub struct SesAdapter {
    client: Client,
    sender: String,
    recipient: String,
}

impl SesAdapter {
    pub fn new(client: Client, config: &SesConfig) -> Self {
        Self {
            client,
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
        }
    }

    /// Builds a client from the default AWS credential chain
    pub async fn connect(config: &SesConfig) -> Self {
        let sdk_config = load_sdk_config(config.region.as_deref()).await;
        Self::new(Client::new(&sdk_config), config)
    }
}

fn content(data: &str) -> NotifyResult<Content> {
    Content::builder()
        .data(data)
        .charset(CHARSET)
        .build()
        .map_err(|e| NotifyError::provider("ses", e))
}

#[async_trait]
impl ChannelAdapter for SesAdapter {
    fn name(&self) -> &'static str {
        "ses"
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Ses
    }

    async fn transmit(&self, message: &Message) -> NotifyResult<String> {
        let email = SesMessage::builder()
            .subject(content(message.subject())?)
            .body(Body::builder().text(content(message.body())?).build())
            .build();

        let output = self
            .client
            .send_email()
            .source(&self.sender)
            .destination(Destination::builder().to_addresses(&self.recipient).build())
            .message(email)
            .send()
            .await
            .map_err(|e| NotifyError::provider("ses", DisplayErrorContext(&e)))?;

        let message_id = output.message_id();
        if message_id.is_empty() {
            return Err(NotifyError::provider("ses", "response carried no MessageId"));
        }
        Ok(message_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ses::config::{BehaviorVersion, Credentials, Region};
    use httpmock::prelude::*;

    fn adapter(server: &MockServer) -> SesAdapter {
        let config = aws_sdk_ses::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-2"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .endpoint_url(server.base_url())
            .build();
        let ses = SesConfig {
            sender: "northstar@example.com".to_string(),
            recipient: "me@example.com".to_string(),
            region: None,
        };
        SesAdapter::new(Client::from_conf(config), &ses)
    }

    #[tokio::test]
    async fn test_send_email_returns_message_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .body_contains("Action=SendEmail")
                    .body_contains("Source=northstar")
                    .body_contains("Destination.ToAddresses.member.1=me");
                then.status(200).header("content-type", "text/xml").body(
                    r#"<SendEmailResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
                         <SendEmailResult><MessageId>ses-msg-1</MessageId></SendEmailResult>
                         <ResponseMetadata><RequestId>req-1</RequestId></ResponseMetadata>
                       </SendEmailResponse>"#,
                );
            })
            .await;

        let result = adapter(&server)
            .send(&Message::new("Northstar Update", "Stretch"))
            .await;

        mock.assert_async().await;
        assert_eq!(result.message_id(), Some("ses-msg-1"));
    }

    #[tokio::test]
    async fn test_rejected_sender_becomes_failed_result() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).body_contains("Action=SendEmail");
                then.status(400).header("content-type", "text/xml").body(
                    r#"<ErrorResponse xmlns="http://ses.amazonaws.com/doc/2010-12-01/">
                         <Error><Type>Sender</Type><Code>MessageRejected</Code>
                         <Message>Email address is not verified.</Message></Error>
                         <RequestId>req-2</RequestId>
                       </ErrorResponse>"#,
                );
            })
            .await;

        let result = adapter(&server)
            .send(&Message::new("Northstar Update", "Stretch"))
            .await;

        let error = result.error().unwrap();
        assert!(error.contains("MessageRejected"));
    }
}
