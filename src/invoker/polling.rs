//! Long-running invoker that sends on a fixed interval inside the
//! daily delivery window.
//!
//! Each cycle either sends one message and sleeps `interval_secs`, or, when
//! the local hour is outside the window, sleeps until the window opens on the
//! next calendar day. Nothing inside a cycle stops the loop, including
//! incomplete channel configuration: the adapter is connected lazily and the
//! connection is retried on every cycle until it succeeds.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::Instrument;

use super::clock::{Clock, Sleeper, SystemClock, TokioSleeper};
use super::window::DeliveryWindow;
use crate::channels::{ChannelAdapter, ChannelConnector, ChannelKind, DeliveryResult};
use crate::config::{ChannelSettings, Settings};
use crate::error::NotifyResult;
use crate::message::{self, MessageSource};

/// What one cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A message was handed to the channel
    Attempted(DeliveryResult),
    /// The message could not be read; nothing was sent
    SourceFailed(String),
    /// The channel adapter could not be built; nothing was sent
    ChannelUnavailable(String),
    /// The local hour was outside the window
    OutsideWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollCycle {
    pub outcome: CycleOutcome,
    /// How long the invoker sleeps before the next cycle
    pub sleep: Duration,
}

/// Hands out an adapter that already exists
struct ReadyConnector(Arc<dyn ChannelAdapter>);

#[async_trait]
impl ChannelConnector for ReadyConnector {
    async fn connect(&self, _settings: &ChannelSettings) -> NotifyResult<Arc<dyn ChannelAdapter>> {
        Ok(self.0.clone())
    }
}

pub struct PollingInvoker<C = SystemClock, S = TokioSleeper> {
    source: Arc<dyn MessageSource>,
    connector: Arc<dyn ChannelConnector>,
    channel: ChannelSettings,
    adapter: Mutex<Option<Arc<dyn ChannelAdapter>>>,
    window: DeliveryWindow,
    interval: Duration,
    clock: C,
    sleeper: S,
}

impl PollingInvoker {
    /// Build from settings; the channel is connected on the first cycle
    /// inside the window
    ///
    /// Missing channel values are reported here but do not prevent the loop
    /// from starting.
    pub fn from_settings(settings: &Settings, connector: Arc<dyn ChannelConnector>) -> NotifyResult<Self> {
        let source = message::from_settings(&settings.message)?;

        let missing = settings.channel.missing_fields();
        if !missing.is_empty() {
            tracing::warn!(
                channel = settings.channel.kind.as_str(),
                missing = %missing.join(", "),
                "Channel configuration incomplete, retrying every cycle"
            );
        }

        Ok(Self::with_parts(
            source,
            connector,
            settings.channel.clone(),
            DeliveryWindow::from_schedule(&settings.schedule),
            Duration::from_secs(settings.schedule.interval_secs),
        ))
    }

    /// Build around an adapter that is already connected
    pub fn new(
        source: Arc<dyn MessageSource>,
        adapter: Arc<dyn ChannelAdapter>,
        window: DeliveryWindow,
        interval: Duration,
    ) -> Self {
        let channel = ChannelSettings {
            kind: adapter.kind(),
            ..Default::default()
        };
        Self::with_parts(source, Arc::new(ReadyConnector(adapter)), channel, window, interval)
    }

    fn with_parts(
        source: Arc<dyn MessageSource>,
        connector: Arc<dyn ChannelConnector>,
        channel: ChannelSettings,
        window: DeliveryWindow,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            connector,
            channel,
            adapter: Mutex::new(None),
            window,
            interval,
            clock: SystemClock,
            sleeper: TokioSleeper,
        }
    }
}

impl<C: Clock, S: Sleeper> PollingInvoker<C, S> {
    /// Replace the clock and sleeper, e.g. with simulated time
    pub fn with_time<C2: Clock, S2: Sleeper>(self, clock: C2, sleeper: S2) -> PollingInvoker<C2, S2> {
        PollingInvoker {
            source: self.source,
            connector: self.connector,
            channel: self.channel,
            adapter: self.adapter,
            window: self.window,
            interval: self.interval,
            clock,
            sleeper,
        }
    }

    fn kind(&self) -> ChannelKind {
        self.channel.kind
    }

    /// The connected adapter, connecting first if needed
    async fn adapter(&self) -> NotifyResult<Arc<dyn ChannelAdapter>> {
        let cached = self
            .adapter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(adapter) = cached {
            return Ok(adapter);
        }

        let adapter = self.connector.connect(&self.channel).await?;
        *self.adapter.lock().unwrap_or_else(PoisonError::into_inner) = Some(adapter.clone());
        Ok(adapter)
    }

    /// Decide and act for the current time, without sleeping
    pub async fn step(&self) -> PollCycle {
        let now = self.clock.now();

        if !self.window.contains(&now) {
            let sleep = match self.window.until_next_start(&now) {
                Ok(duration) => duration,
                Err(e) => {
                    tracing::warn!(error = %e, "Cannot compute next window start, using interval");
                    self.interval
                }
            };
            tracing::info!(
                hour = now.hour(),
                sleep_secs = sleep.as_secs(),
                "Outside delivery window, sleeping until {}:00 tomorrow",
                self.window.start_hour()
            );
            return PollCycle {
                outcome: CycleOutcome::OutsideWindow,
                sleep,
            };
        }

        let adapter = match self.adapter().await {
            Ok(adapter) => adapter,
            Err(e) => {
                if e.is_configuration() {
                    tracing::warn!(error = %e, "Channel not ready, nothing sent");
                } else {
                    tracing::error!(error = %e, "Failed to connect channel");
                }
                return PollCycle {
                    outcome: CycleOutcome::ChannelUnavailable(e.to_string()),
                    sleep: self.interval,
                };
            }
        };

        let outcome = match self.source.fetch().await {
            Ok(message) => CycleOutcome::Attempted(adapter.send(&message).await),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read message");
                CycleOutcome::SourceFailed(e.to_string())
            }
        };

        PollCycle {
            outcome,
            sleep: self.interval,
        }
    }

    /// One step followed by its sleep
    pub async fn cycle(&self) -> PollCycle {
        let cycle = self.step().await;
        self.sleeper.sleep(cycle.sleep).await;
        cycle
    }

    /// Run until the process is terminated
    pub async fn run(&self) {
        tracing::info!(
            channel = self.kind().as_str(),
            start_hour = self.window.start_hour(),
            end_hour = self.window.end_hour(),
            interval_secs = self.interval.as_secs(),
            "Polling invoker started"
        );

        let mut iteration: u64 = 0;
        loop {
            iteration += 1;
            let span = tracing::info_span!("poll_cycle", iteration, channel = self.kind().as_str());
            self.cycle().instrument(span).await;
        }
    }
}
