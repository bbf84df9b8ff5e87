//! Kline snapshot fetcher.
//!
//! One GET per poll returns the most recent window of 1-minute candles.
//! There is no retry here: the poll timer is the retry policy, and the
//! caller keeps the previous window when a fetch fails.

use tracing::{debug, info};

use crate::Result;
use crate::config::ExchangeConfig;
use crate::models::Candle;
use crate::models::candle::parse_klines;

/// Path of the klines endpoint under the REST base URL.
const KLINES_PATH: &str = "/api/v3/klines";

/// HTTP client bound to one symbol, interval and window size.
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    base_url: String,
    symbol: String,
    interval: String,
    limit: u16,
}

impl SnapshotClient {
    /// Builds a client from the exchange configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Http`](crate::PulseError::Http) if the HTTP
    /// client cannot be constructed.
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("btcpulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            symbol: config.symbol.clone(),
            interval: config.interval.clone(),
            limit: config.candle_limit,
        })
    }

    /// Full URL of the klines endpoint, without query parameters.
    pub fn endpoint(&self) -> String {
        format!("{}{KLINES_PATH}", self.base_url)
    }

    /// Fetches the latest candle window, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Http`](crate::PulseError::Http) on transport
    /// failure or a non-2xx status, and
    /// [`PulseError::Json`](crate::PulseError::Json) if the body is not a
    /// klines array.
    pub async fn fetch_candles(&self) -> Result<Vec<Candle>> {
        let limit = self.limit.to_string();
        debug!(symbol = %self.symbol, interval = %self.interval, limit = %limit, "Requesting klines");

        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("symbol", self.symbol.as_str()),
                ("interval", self.interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let response = response.error_for_status()?;
        let body = response.text().await?;
        let candles = parse_klines(&body)?;

        info!(
            symbol = %self.symbol,
            count = candles.len(),
            last_close = candles.last().map(|c| c.close),
            "Fetched kline snapshot"
        );
        Ok(candles)
    }
}
