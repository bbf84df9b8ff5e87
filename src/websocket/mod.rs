//! Async WebSocket client for the ticker stream (or the legacy relay).
//!
//! - [`connect`] performs the handshake and splits the stream.
//! - [`connection`] runs one transport per attempt and reports its
//!   lifecycle back to the UI loop.

pub mod connection;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;
use tungstenite::Message;

use crate::Result;

pub use connection::{FeedEvent, FeedHandle, spawn_feed};

/// Write half of a stream connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a stream connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns a [`PulseError`](crate::PulseError) if the connection or TLS
/// handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!(url = %url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}
