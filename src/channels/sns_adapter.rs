//! AWS SNS SMS adapter (direct publish to a phone number).

use async_trait::async_trait;
use aws_sdk_sns::Client;
use aws_sdk_sns::error::DisplayErrorContext;

use super::adapter::{ChannelAdapter, ChannelKind};
use crate::config::SnsConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::external::aws::load_sdk_config;
use crate::message::Message;

pub struct SnsAdapter {
    client: Client,
    phone_number: String,
}

impl SnsAdapter {
    pub fn new(client: Client, config: &SnsConfig) -> Self {
        Self {
            client,
            phone_number: config.phone_number.trim().to_string(),
        }
    }

    pub async fn connect(config: &SnsConfig) -> Self {
        let sdk_config = load_sdk_config(config.region.as_deref()).await;
        Self::new(Client::new(&sdk_config), config)
    }
}

#[async_trait]
impl ChannelAdapter for SnsAdapter {
    fn name(&self) -> &'static str {
        "sns"
    }

    fn kind(&self) -> ChannelKind {
        ChannelKind::Sns
    }

    async fn transmit(&self, message: &Message) -> NotifyResult<String> {
        let output = self
            .client
            .publish()
            .phone_number(&self.phone_number)
            .message(message.body())
            .subject(message.subject())
            .send()
            .await
            .map_err(|e| NotifyError::provider("sns", DisplayErrorContext(&e)))?;

        output
            .message_id()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| NotifyError::provider("sns", "response carried no MessageId"))
    }
}
