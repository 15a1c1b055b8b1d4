//! Stateless invoker answering one external trigger with a status response.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::response::InvocationResponse;
use crate::channels::{ChannelConnector, DeliveryOutcome, DeliveryResult, ProviderConnector};
use crate::config::Settings;
use crate::error::{NotifyError, NotifyResult};
use crate::message;

pub struct TriggeredInvoker<K = ProviderConnector> {
    settings: Arc<Settings>,
    connector: K,
}

impl TriggeredInvoker {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_connector(settings, ProviderConnector)
    }
}

impl<K: ChannelConnector> TriggeredInvoker<K> {
    pub fn with_connector(settings: Arc<Settings>, connector: K) -> Self {
        Self {
            settings,
            connector,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one invocation
    ///
    /// | Situation | Status |
    /// |---|---|
    /// | required channel values missing | 400 |
    /// | message unreadable, provider failure | 500 with the error |
    /// | delivered | 200 with `messageId` |
    /// | anything else | 500 `Internal server error: ...` |
    pub async fn invoke(&self) -> InvocationResponse {
        let invocation_id = Uuid::new_v4();
        let kind = self.settings.channel.kind;
        let span = tracing::info_span!(
            "invocation",
            %invocation_id,
            channel = kind.as_str()
        );

        async {
            let response = match self.dispatch().await {
                Ok(result) => match result.outcome() {
                    DeliveryOutcome::Delivered { message_id } => InvocationResponse::success(
                        format!("{} sent successfully", kind.noun()),
                        message_id.clone(),
                    ),
                    DeliveryOutcome::Failed { error } => InvocationResponse::server_error(error.clone()),
                },
                Err(e) => Self::error_response(e),
            };

            tracing::info!(status_code = response.status_code, "Invocation finished");
            response
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self) -> NotifyResult<DeliveryResult> {
        let missing = self.settings.channel.missing_fields();
        if !missing.is_empty() {
            return Err(NotifyError::missing(missing));
        }

        let message = message::from_settings(&self.settings.message)?.fetch().await?;
        let adapter = self.connector.connect(&self.settings.channel).await?;
        Ok(adapter.send(&message).await)
    }

    fn error_response(error: NotifyError) -> InvocationResponse {
        match error {
            NotifyError::ConfigurationMissing { .. } => {
                tracing::warn!(error = %error, "Invocation rejected");
                InvocationResponse::bad_request(error.to_string())
            }
            NotifyError::SourceUnavailable { .. } | NotifyError::ProviderFailure { .. } => {
                tracing::error!(error = %error, "Invocation failed");
                InvocationResponse::server_error(error.to_string())
            }
            other => {
                tracing::error!(error = ?other, "Unexpected invocation error");
                InvocationResponse::internal(other)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{ChannelAdapter, ChannelKind};
    use crate::config::{ChannelSettings, MessageSettings, SnsConfig, SourceKind};
    use crate::message::Message;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeAdapter {
        reply: Result<String, String>,
        sent: Arc<Mutex<Vec<Message>>>,
    }

    #[async_trait]
    impl ChannelAdapter for FakeAdapter {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn kind(&self) -> ChannelKind {
            ChannelKind::Sns
        }

        async fn transmit(&self, message: &Message) -> NotifyResult<String> {
            self.sent.lock().unwrap().push(message.clone());
            self.reply
                .clone()
                .map_err(|e| NotifyError::provider("sns", e))
        }
    }

    #[derive(Clone)]
    struct FakeConnector {
        reply: Result<String, String>,
        connects: Arc<AtomicUsize>,
        sent: Arc<Mutex<Vec<Message>>>,
    }

    impl FakeConnector {
        fn replying(reply: Result<&str, &str>) -> Self {
            Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                connects: Arc::new(AtomicUsize::new(0)),
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ChannelConnector for FakeConnector {
        async fn connect(
            &self,
            _settings: &ChannelSettings,
        ) -> NotifyResult<Arc<dyn ChannelAdapter>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FakeAdapter {
                reply: self.reply.clone(),
                sent: self.sent.clone(),
            }))
        }
    }

    fn sms_settings(message: MessageSettings) -> Arc<Settings> {
        Arc::new(Settings {
            message,
            channel: ChannelSettings {
                kind: ChannelKind::Sns,
                sns: SnsConfig {
                    phone_number: "+12025550123".to_string(),
                    region: None,
                },
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn constant(text: &str) -> MessageSettings {
        MessageSettings {
            source: SourceKind::Constant,
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_delivered_is_200_with_message_id() {
        let connector = FakeConnector::replying(Ok("sns-msg-1"));
        let invoker = TriggeredInvoker::with_connector(sms_settings(constant("Stretch")), connector.clone());

        let response = invoker.invoke().await;

        assert_eq!(response, InvocationResponse::success("SMS sent successfully", "sns-msg-1"));
        assert_eq!(connector.sent.lock().unwrap()[0].body(), "Stretch");
    }

    #[tokio::test]
    async fn test_missing_configuration_is_400_without_connecting() {
        let connector = FakeConnector::replying(Ok("unused"));
        let settings = Arc::new(Settings {
            channel: ChannelSettings {
                kind: ChannelKind::Sns,
                ..Default::default()
            },
            ..Default::default()
        });
        let invoker = TriggeredInvoker::with_connector(settings, connector.clone());

        let response = invoker.invoke().await;

        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.body.error.as_deref(),
            Some("Missing required configuration: channel.sns.phone_number")
        );
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_500_with_error() {
        let connector = FakeConnector::replying(Err("throttled"));
        let invoker = TriggeredInvoker::with_connector(sms_settings(constant("Stretch")), connector);

        let response = invoker.invoke().await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body.error.as_deref(), Some("sns delivery failed: throttled"));
        assert_eq!(response.body.message_id, None);
    }

    #[tokio::test]
    async fn test_missing_file_sends_fallback() {
        let dir = tempfile::TempDir::new().unwrap();
        let connector = FakeConnector::replying(Ok("sns-msg-2"));
        let message = MessageSettings {
            base_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let invoker = TriggeredInvoker::with_connector(sms_settings(message), connector.clone());

        let response = invoker.invoke().await;

        assert_eq!(response.status_code, 200);
        assert_eq!(
            connector.sent.lock().unwrap()[0].body(),
            "Your Northstar update is ready!"
        );
    }

    #[tokio::test]
    async fn test_unreadable_source_is_500() {
        let dir = tempfile::TempDir::new().unwrap();
        let connector = FakeConnector::replying(Ok("unused"));
        // a directory where the file should be
        let message = MessageSettings {
            path: dir.path().to_string_lossy().into_owned(),
            ..Default::default()
        };
        let invoker = TriggeredInvoker::with_connector(sms_settings(message), connector.clone());

        let response = invoker.invoke().await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.error.unwrap().starts_with("Message source unavailable"));
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let response = TriggeredInvoker::<FakeConnector>::error_response(NotifyError::validation(
            "channel.apns.private_key",
            "bad PEM",
        ));
        assert_eq!(response.status_code, 500);
        assert!(response
            .body
            .error
            .unwrap()
            .starts_with("Internal server error: "));
    }
}
