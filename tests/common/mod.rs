//! Shared test utilities and constants.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;

use btcpulse::tui::Message;
use btcpulse::websocket::FeedEvent;

/// Exchange REST base URL used by the live integration tests.
pub const BINANCE_REST_URL: &str = "https://api.binance.com";

/// Ticker stream used by the live integration tests.
pub const BINANCE_STREAM_URL: &str = "wss://stream.binance.com:9443/ws/btcusdt@ticker";

pub const KLINES_JSON: &str = include_str!("../fixtures/klines.json");
pub const TICKER_JSON: &str = include_str!("../fixtures/ticker.json");
pub const RELAY_JSON: &str = include_str!("../fixtures/relay.json");

/// How long a test waits for one feed event before failing.
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts a one-connection WebSocket server on an ephemeral port and runs
/// `handler` against the accepted stream. Returns the `ws://` URL.
pub async fn spawn_ws_server<F, Fut>(handler: F) -> String
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("no local addr");

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept failed");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("websocket handshake failed");
        handler(ws).await;
    });

    format!("ws://{addr}")
}

/// An address nothing listens on.
pub async fn unused_ws_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("no local addr");
    drop(listener);
    format!("ws://{addr}")
}

/// Receives the next feed event for `attempt`, failing on timeout.
pub async fn next_feed_event(rx: &mut mpsc::UnboundedReceiver<Message>, attempt: u64) -> FeedEvent {
    loop {
        let message = tokio::time::timeout(EVENT_TIMEOUT, rx.recv())
            .await
            .expect("timed out waiting for feed event")
            .expect("channel closed");
        if let Message::Feed { attempt: a, event } = message {
            assert_eq!(a, attempt, "event tagged with the wrong attempt");
            return event;
        }
    }
}
