//! Executes [`Action`]s and owns every background task they start.
//!
//! The runtime is the only holder of timer and transport handles, so
//! [`Runtime::teardown`] can cancel all of them: the poll timer, any
//! in-flight snapshot fetch, the live transport and a pending reconnect.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::Result;
use crate::config::{AppConfig, DataSource};
use crate::rest::SnapshotClient;
use crate::tui::{Action, Message};
use crate::websocket::{FeedHandle, spawn_feed};

/// Side-effect executor for the UI loop.
pub struct Runtime {
    tx: mpsc::UnboundedSender<Message>,
    client: SnapshotClient,
    feed_url: String,
    poll_interval: Duration,
    reconnect_delay: Duration,

    poll: Option<JoinHandle<()>>,
    fetch: Option<JoinHandle<()>>,
    feed: Option<FeedHandle>,
    reconnect: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Creates a runtime that reports back on `tx`.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Http`](crate::PulseError::Http) if the HTTP
    /// client cannot be built.
    pub fn new(config: &AppConfig, tx: mpsc::UnboundedSender<Message>) -> Result<Self> {
        let feed_url = match &config.source {
            DataSource::Direct => config.feed.stream_url.clone(),
            DataSource::Relay { url } => url.clone(),
        };

        Ok(Self {
            tx,
            client: SnapshotClient::new(&config.exchange)?,
            feed_url,
            poll_interval: config.exchange.poll_interval,
            reconnect_delay: config.feed.reconnect_delay,
            poll: None,
            fetch: None,
            feed: None,
            reconnect: None,
        })
    }

    /// Carries out one action.
    pub fn execute(&mut self, action: Action) {
        match action {
            Action::StartPolling => self.start_polling(),
            Action::FetchSnapshot => self.fetch_snapshot(),
            Action::OpenFeed { attempt } => self.open_feed(attempt),
            Action::ScheduleReconnect => self.schedule_reconnect(),
        }
    }

    /// Whether a reconnect timer is armed and has not fired yet.
    pub fn has_pending_reconnect(&self) -> bool {
        self.reconnect.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Attempt number of the transport currently held, if any.
    pub fn feed_attempt(&self) -> Option<u64> {
        self.feed.as_ref().map(FeedHandle::attempt)
    }

    fn start_polling(&mut self) {
        if self.poll.is_some() {
            return;
        }

        let tx = self.tx.clone();
        let period = self.poll_interval;
        info!(period_secs = period.as_secs(), "Starting snapshot poll timer");
        self.poll = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Message::PollDue).is_err() {
                    break;
                }
            }
        }));
    }

    fn fetch_snapshot(&mut self) {
        if self.fetch.as_ref().is_some_and(|task| !task.is_finished()) {
            debug!("Snapshot fetch already in flight, skipping");
            return;
        }

        let tx = self.tx.clone();
        let client = self.client.clone();
        self.fetch = Some(tokio::spawn(async move {
            let result = client.fetch_candles().await.map_err(|e| e.to_string());
            let _ = tx.send(Message::Snapshot(result));
        }));
    }

    fn open_feed(&mut self, attempt: u64) {
        // The timer that led here has fired; the previous transport has
        // already reported Closed.
        self.reconnect = None;
        self.feed = Some(spawn_feed(self.feed_url.clone(), attempt, self.tx.clone()));
    }

    fn schedule_reconnect(&mut self) {
        if let Some(previous) = self.reconnect.take() {
            previous.abort();
        }

        let tx = self.tx.clone();
        let delay = self.reconnect_delay;
        info!(delay_secs = delay.as_secs_f64(), "Scheduling live feed reconnect");
        self.reconnect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Message::ReconnectDue);
        }));
    }

    /// Cancels every timer, aborts any in-flight fetch and closes the live
    /// transport.
    pub async fn teardown(mut self) {
        if let Some(poll) = self.poll.take() {
            poll.abort();
        }
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
        if let Some(reconnect) = self.reconnect.take() {
            reconnect.abort();
        }
        if let Some(feed) = self.feed.take() {
            feed.close().await;
        }
        info!("Runtime torn down");
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        for task in [self.poll.take(), self.fetch.take(), self.reconnect.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }
}
