//! Snapshot fetcher tests against a mock exchange.

mod common;

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use btcpulse::PulseError;
use btcpulse::config::{ExchangeConfig, INTERVAL, SYMBOL};
use btcpulse::rest::SnapshotClient;

use common::KLINES_JSON;

fn exchange_config(base_url: &str, limit: u16) -> ExchangeConfig {
    ExchangeConfig {
        rest_url: base_url.to_string(),
        symbol: SYMBOL.to_string(),
        interval: INTERVAL.to_string(),
        candle_limit: limit,
        poll_interval: Duration::from_secs(60),
    }
}

#[tokio::test]
async fn test_fetch_single_candle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1m"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[[1000,"100","110","90","105","10",1059]]"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = SnapshotClient::new(&exchange_config(&server.uri(), 1)).unwrap();
    let candles = client.fetch_candles().await.expect("fetch failed");

    assert_eq!(candles.len(), 1);
    let candle = candles[0];
    assert_eq!(candle.timestamp, 1000);
    assert_eq!(candle.open, 100.0);
    assert_eq!(candle.high, 110.0);
    assert_eq!(candle.low, 90.0);
    assert_eq!(candle.close, 105.0);
    assert_eq!(candle.volume, 10.0);
}

#[tokio::test]
async fn test_fetch_default_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(KLINES_JSON))
        .mount(&server)
        .await;

    let client = SnapshotClient::new(&exchange_config(&server.uri(), 100)).unwrap();
    let candles = client.fetch_candles().await.unwrap();

    assert_eq!(candles.len(), 3);
    assert_eq!(candles.last().unwrap().close, 37037.0);
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let base = format!("{}/", server.uri());
    let client = SnapshotClient::new(&exchange_config(&base, 5)).unwrap();

    assert_eq!(client.endpoint(), format!("{}/api/v3/klines", server.uri()));
    assert!(client.fetch_candles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = SnapshotClient::new(&exchange_config(&server.uri(), 100)).unwrap();
    let err = client.fetch_candles().await.unwrap_err();

    assert!(matches!(err, PulseError::Http(_)));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = SnapshotClient::new(&exchange_config(&server.uri(), 100)).unwrap();
    let err = client.fetch_candles().await.unwrap_err();

    assert!(matches!(err, PulseError::Json(_)));
}

#[tokio::test]
async fn test_unreachable_exchange_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SnapshotClient::new(&exchange_config(&format!("http://{addr}"), 100)).unwrap();
    let err = client.fetch_candles().await.unwrap_err();

    assert!(matches!(err, PulseError::Http(_)));
}
