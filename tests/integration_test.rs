//! Live exchange integration tests.
//!
//! These tests hit the public Binance REST API and ticker stream and require
//! network access.
//! Run with: `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

mod common;

use std::time::Duration;

use tokio::sync::mpsc;

use btcpulse::config::{ExchangeConfig, INTERVAL, SYMBOL};
use btcpulse::models::TickerMessage;
use btcpulse::rest::SnapshotClient;
use btcpulse::websocket::{FeedEvent, spawn_feed};

use common::{BINANCE_REST_URL, BINANCE_STREAM_URL, next_feed_event};

#[tokio::test]
async fn test_fetch_live_klines() {
    let client = SnapshotClient::new(&ExchangeConfig {
        rest_url: BINANCE_REST_URL.to_string(),
        symbol: SYMBOL.to_string(),
        interval: INTERVAL.to_string(),
        candle_limit: 10,
        poll_interval: Duration::from_secs(60),
    })
    .expect("Failed to build client");

    let candles = client.fetch_candles().await.expect("Failed to fetch klines");

    assert_eq!(candles.len(), 10);
    assert!(candles.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    assert!(candles.iter().all(|c| c.low <= c.close && c.close <= c.high));
}

#[tokio::test]
async fn test_live_ticker_stream() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = spawn_feed(BINANCE_STREAM_URL.to_string(), 1, tx);

    assert_eq!(next_feed_event(&mut rx, 1).await, FeedEvent::Opened);

    let received = tokio::time::timeout(Duration::from_secs(15), async {
        loop {
            if let FeedEvent::Text(text) = next_feed_event(&mut rx, 1).await {
                return text;
            }
        }
    })
    .await
    .expect("No ticker frame within 15s");

    let price = TickerMessage::parse(&received)
        .and_then(|msg| msg.price())
        .expect("Ticker frame did not carry a price");
    assert!(price > 0.0);

    handle.close().await;
}
