use std::sync::Arc;

use async_trait::async_trait;

use super::adapter::{ChannelAdapter, ChannelKind};
use super::apns_adapter::ApnsAdapter;
use super::ses_adapter::SesAdapter;
use super::smtp_adapter::SmtpAdapter;
use super::sns_adapter::SnsAdapter;
use crate::config::ChannelSettings;
use crate::error::{NotifyError, NotifyResult};

/// Builds the adapter for the configured channel
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    async fn connect(&self, settings: &ChannelSettings) -> NotifyResult<Arc<dyn ChannelAdapter>>;
}

#[async_trait]
impl<T: ChannelConnector + ?Sized> ChannelConnector for Arc<T> {
    async fn connect(&self, settings: &ChannelSettings) -> NotifyResult<Arc<dyn ChannelAdapter>> {
        (**self).connect(settings).await
    }
}

/// Connector for the real providers
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderConnector;

#[async_trait]
impl ChannelConnector for ProviderConnector {
    async fn connect(&self, settings: &ChannelSettings) -> NotifyResult<Arc<dyn ChannelAdapter>> {
        connect(settings).await
    }
}

/// Check the active channel's required values and build its adapter
///
/// All missing keys are reported together.
pub async fn connect(settings: &ChannelSettings) -> NotifyResult<Arc<dyn ChannelAdapter>> {
    let missing = settings.missing_fields();
    if !missing.is_empty() {
        return Err(NotifyError::missing(missing));
    }

    let adapter: Arc<dyn ChannelAdapter> = match settings.kind {
        ChannelKind::Smtp => Arc::new(SmtpAdapter::new(&settings.smtp)?),
        ChannelKind::Ses => Arc::new(SesAdapter::connect(&settings.ses).await),
        ChannelKind::Sns => Arc::new(SnsAdapter::connect(&settings.sns).await),
        ChannelKind::Apns => Arc::new(ApnsAdapter::new(&settings.apns)?),
    };

    tracing::debug!(channel = adapter.name(), "Channel adapter ready");
    Ok(adapter)
}
