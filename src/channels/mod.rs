//! Notification channels with pluggable providers.
//!
//! The core trait [`ChannelAdapter`] turns a [`Message`](crate::message::Message)
//! into exactly one provider call. The active provider is chosen by
//! `channel.kind` and built through a [`ChannelConnector`].

mod adapter;
mod apns_adapter;
mod connector;
mod ses_adapter;
mod smtp_adapter;
mod sns_adapter;

pub use adapter::{ChannelAdapter, ChannelKind, DeliveryOutcome, DeliveryResult};
pub use apns_adapter::ApnsAdapter;
pub use connector::{ChannelConnector, ProviderConnector, connect};
pub use ses_adapter::SesAdapter;
pub use smtp_adapter::SmtpAdapter;
pub use sns_adapter::SnsAdapter;
