//! Shared state for the HTTP host.

use std::sync::Arc;

use crate::channels::{ChannelConnector, ProviderConnector};
use crate::config::Settings;
use crate::invoker::TriggeredInvoker;

/// Connector chosen at startup, shared by every request
pub type SharedConnector = Arc<dyn ChannelConnector>;

/// State handed to every handler
///
/// Cloning is cheap; the invoker is behind an `Arc` and holds no per-request
/// state.
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<TriggeredInvoker<SharedConnector>>,
}

impl AppState {
    /// State backed by the real providers
    pub fn new(settings: Settings) -> Self {
        Self::with_connector(settings, Arc::new(ProviderConnector))
    }

    pub fn with_connector(settings: Settings, connector: SharedConnector) -> Self {
        Self {
            invoker: Arc::new(TriggeredInvoker::with_connector(
                Arc::new(settings),
                connector,
            )),
        }
    }

    pub fn settings(&self) -> &Settings {
        self.invoker.settings()
    }
}
