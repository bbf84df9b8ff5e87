//! One live-feed transport per connection attempt.
//!
//! [`spawn_feed`] connects, forwards every text frame, and reports the
//! transport lifecycle as [`FeedEvent`]s tagged with the attempt number.
//! It never reconnects on its own: reconnect timing is decided by
//! [`LiveFeed`](crate::market::LiveFeed) and carried out by the
//! [`Runtime`](crate::runtime::Runtime), so there is exactly one place
//! that can open a socket.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tungstenite::Message as WsMessage;

use super::connect;
use crate::tui::Message;

/// How long [`FeedHandle::close`] waits for the close frame to go out.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Lifecycle and payload events of a single transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Handshake completed.
    Opened,
    /// A text frame arrived.
    Text(String),
    /// The transport failed. Always followed by [`FeedEvent::Closed`].
    Error(String),
    /// The transport is gone and will send nothing more.
    Closed,
}

/// Owner of a running transport task.
///
/// Dropping the handle aborts the task; [`close`](Self::close) shuts it
/// down with a close frame first.
#[derive(Debug)]
pub struct FeedHandle {
    attempt: u64,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Sends a close frame and waits briefly for the task to end.
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if tokio::time::timeout(CLOSE_GRACE, &mut self.task)
            .await
            .is_err()
        {
            warn!(attempt = self.attempt, "Live feed did not close in time, aborting");
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns a transport for `attempt` that reports to `tx`.
pub fn spawn_feed(url: String, attempt: u64, tx: mpsc::UnboundedSender<Message>) -> FeedHandle {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(run_feed(url, attempt, tx, shutdown_rx));

    FeedHandle {
        attempt,
        shutdown: Some(shutdown_tx),
        task,
    }
}

async fn run_feed(
    url: String,
    attempt: u64,
    tx: mpsc::UnboundedSender<Message>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let emit = |event: FeedEvent| tx.send(Message::Feed { attempt, event }).is_ok();

    info!(attempt, url = %url, "Opening live feed");
    let (mut write, mut read) = tokio::select! {
        result = connect(&url) => match result {
            Ok(pair) => pair,
            Err(e) => {
                warn!(attempt, "Live feed connection failed: {e}");
                emit(FeedEvent::Error(e.to_string()));
                emit(FeedEvent::Closed);
                return;
            }
        },
        _ = &mut shutdown => {
            debug!(attempt, "Live feed shut down while connecting");
            return;
        }
    };

    if !emit(FeedEvent::Opened) {
        return;
    }

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = write.send(WsMessage::Close(None)).await {
                    debug!(attempt, "Close frame not sent: {e}");
                }
                info!(attempt, "Live feed closed");
                return;
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        if !emit(FeedEvent::Text(text.as_str().to_owned())) {
                            return;
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        info!(attempt, frame = ?frame, "Live feed received close frame");
                    }
                    Some(Ok(_)) => {} // Binary/Ping/Pong frames
                    Some(Err(e)) => {
                        warn!(attempt, "Live feed error: {e}");
                        emit(FeedEvent::Error(e.to_string()));
                        emit(FeedEvent::Closed);
                        return;
                    }
                    None => {
                        info!(attempt, "Live feed stream ended");
                        emit(FeedEvent::Closed);
                        return;
                    }
                }
            }
        }
    }
}
