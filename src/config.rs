//! Application configuration loaded from environment variables.
//!
//! Every value has a default, so the chart runs with no environment at all.
//! Recognised variables:
//! - `BTCPULSE_REST_URL`: exchange REST base URL
//! - `BTCPULSE_STREAM_URL`: ticker stream URL
//! - `BTCPULSE_CANDLE_LIMIT`: number of 1-minute candles per snapshot
//! - `BTCPULSE_POLL_SECS`: snapshot poll interval
//! - `BTCPULSE_RECONNECT_SECS`: delay before reopening a closed stream
//! - `BTCPULSE_SOURCE`: `direct` (default) or `relay`
//! - `BTCPULSE_RELAY_URL` / `BTCPULSE_ENV`: relay endpoint resolution
//! - `BTCPULSE_EXTEND_RANGE`: widen high/low when the stream patches a close
//! - `BTCPULSE_LOG_FILE`: where tracing output goes while the TUI owns stdout
//!
//! Empty values are treated as absent.

use std::path::PathBuf;
use std::time::Duration;

use crate::PulseError;
use crate::market::PatchMode;

/// Default exchange REST endpoint.
pub const DEFAULT_REST_URL: &str = "https://api.binance.com";

/// Default ticker stream for the fixed symbol.
pub const DEFAULT_STREAM_URL: &str = "wss://stream.binance.com:9443/ws/btcusdt@ticker";

/// Local-development relay endpoint.
pub const DEFAULT_RELAY_URL: &str = "ws://127.0.0.1:3001/ws";

/// The only symbol this chart follows.
pub const SYMBOL: &str = "BTCUSDT";

/// Kline interval requested from the exchange.
pub const INTERVAL: &str = "1m";

const DEFAULT_CANDLE_LIMIT: u16 = 100;
const MAX_CANDLE_LIMIT: u16 = 1000;
const DEFAULT_POLL_SECS: u64 = 60;
const DEFAULT_RECONNECT_SECS: u64 = 3;
const DEFAULT_LOG_FILE: &str = "btcpulse.log";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub exchange: ExchangeConfig,
    pub feed: FeedConfig,
    pub source: DataSource,
    pub patch_mode: PatchMode,
    pub log_file: PathBuf,
    /// Shown to the user once the TUI is up, e.g. when the relay was
    /// requested but no endpoint resolved.
    pub startup_warning: Option<String>,
}

/// REST snapshot settings.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub rest_url: String,
    pub symbol: String,
    pub interval: String,
    pub candle_limit: u16,
    pub poll_interval: Duration,
}

/// Streaming feed settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub stream_url: String,
    pub reconnect_delay: Duration,
}

/// Where candle data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// REST polling plus the exchange ticker stream.
    Direct,
    /// A relay that pushes the full candle window on every message.
    Relay { url: String },
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Direct => "direct",
            DataSource::Relay { .. } => "relay",
        }
    }
}

/// Outcome of resolving the relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEndpoint {
    Enabled(String),
    Disabled,
}

impl RelayEndpoint {
    /// Resolves the relay URL: explicit override first, then the local
    /// development default, otherwise the relay is disabled.
    pub fn resolve(override_url: Option<String>, development: bool) -> Self {
        match override_url {
            Some(url) => RelayEndpoint::Enabled(url),
            None if development => RelayEndpoint::Enabled(DEFAULT_RELAY_URL.to_string()),
            None => RelayEndpoint::Disabled,
        }
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`PulseError::Config`] if a numeric or enumerated variable
/// holds a value that cannot be used.
pub fn fetch_config() -> crate::Result<AppConfig> {
    AppConfig::from_lookup(non_empty_var)
}

impl AppConfig {
    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// [`fetch_config`] passes the process environment; tests pass a map.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Config`] on unparsable or out-of-range values.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

        let candle_limit = match var("BTCPULSE_CANDLE_LIMIT") {
            Some(raw) => parse_limit(&raw)?,
            None => DEFAULT_CANDLE_LIMIT,
        };
        let poll_interval = parse_secs("BTCPULSE_POLL_SECS", var("BTCPULSE_POLL_SECS"))?
            .unwrap_or(Duration::from_secs(DEFAULT_POLL_SECS));
        let reconnect_delay =
            parse_secs("BTCPULSE_RECONNECT_SECS", var("BTCPULSE_RECONNECT_SECS"))?
                .unwrap_or(Duration::from_secs(DEFAULT_RECONNECT_SECS));

        let extend_range = match var("BTCPULSE_EXTEND_RANGE") {
            Some(raw) => parse_flag("BTCPULSE_EXTEND_RANGE", &raw)?,
            None => false,
        };
        let patch_mode = if extend_range {
            PatchMode::ExtendRange
        } else {
            PatchMode::CloseOnly
        };

        let development = var("BTCPULSE_ENV").is_some_and(|env| env == "development");
        let relay = RelayEndpoint::resolve(var("BTCPULSE_RELAY_URL"), development);

        let mut startup_warning = None;
        let source = match var("BTCPULSE_SOURCE").as_deref() {
            None | Some("direct") => DataSource::Direct,
            Some("relay") => match relay {
                RelayEndpoint::Enabled(url) => DataSource::Relay { url },
                RelayEndpoint::Disabled => {
                    startup_warning = Some(
                        "relay requested but no relay URL configured; using direct exchange feed"
                            .to_string(),
                    );
                    DataSource::Direct
                }
            },
            Some(other) => {
                return Err(PulseError::Config(format!(
                    "BTCPULSE_SOURCE must be `direct` or `relay`, got `{other}`"
                )));
            }
        };

        Ok(AppConfig {
            exchange: ExchangeConfig {
                rest_url: var("BTCPULSE_REST_URL").unwrap_or_else(|| DEFAULT_REST_URL.to_string()),
                symbol: SYMBOL.to_string(),
                interval: INTERVAL.to_string(),
                candle_limit,
                poll_interval,
            },
            feed: FeedConfig {
                stream_url: var("BTCPULSE_STREAM_URL")
                    .unwrap_or_else(|| DEFAULT_STREAM_URL.to_string()),
                reconnect_delay,
            },
            source,
            patch_mode,
            log_file: var("BTCPULSE_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            startup_warning,
        })
    }
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_limit(raw: &str) -> crate::Result<u16> {
    let limit: u16 = raw.parse().map_err(|_| {
        PulseError::Config(format!("BTCPULSE_CANDLE_LIMIT is not a number: `{raw}`"))
    })?;
    if limit == 0 || limit > MAX_CANDLE_LIMIT {
        return Err(PulseError::Config(format!(
            "BTCPULSE_CANDLE_LIMIT must be between 1 and {MAX_CANDLE_LIMIT}, got {limit}"
        )));
    }
    Ok(limit)
}

fn parse_secs(name: &str, raw: Option<String>) -> crate::Result<Option<Duration>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(PulseError::Config(format!("{name} must be greater than zero"))),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
        Err(_) => Err(PulseError::Config(format!(
            "{name} is not a whole number of seconds: `{raw}`"
        ))),
    }
}

fn parse_flag(name: &str, raw: &str) -> crate::Result<bool> {
    match raw {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(PulseError::Config(format!(
            "{name} must be a boolean flag, got `{raw}`"
        ))),
    }
}
