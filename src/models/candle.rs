//! Candle model and the exchange kline tuple it is parsed from.

use std::fmt;

use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::{PriceField, parse_price};

/// A single 1-minute OHLCV bar.
///
/// The serialized form (`timestamp`, `open`, `high`, `low`, `close`,
/// `volume`) is also the candle shape pushed by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in exchange epoch milliseconds.
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One entry of the exchange klines array.
///
/// The exchange sends `[openTime, open, high, low, close, volume,
/// closeTime, ...]` with prices as strings. Only the first six fields are
/// read; anything after them is skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kline(pub Candle);

impl From<Kline> for Candle {
    fn from(kline: Kline) -> Self {
        kline.0
    }
}

impl<'de> Deserialize<'de> for Kline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(KlineVisitor)
    }
}

struct KlineVisitor;

impl<'de> Visitor<'de> for KlineVisitor {
    type Value = Kline;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a kline array of at least six elements")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Kline, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let timestamp: u64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;

        let mut prices = [0.0_f64; 5];
        for (i, slot) in prices.iter_mut().enumerate() {
            let field: PriceField = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i + 1, &self))?;
            *slot = parse_price(&field).map_err(de::Error::custom)?;
        }

        // closeTime, quote volume, trade count, ...
        while seq.next_element::<IgnoredAny>()?.is_some() {}

        let [open, high, low, close, volume] = prices;
        Ok(Kline(Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }))
    }
}

/// Parses a klines response body into candles, oldest first as delivered.
///
/// # Errors
///
/// Returns [`PulseError::Json`](crate::PulseError::Json) if the body is not
/// an array of kline tuples.
pub fn parse_klines(body: &str) -> crate::Result<Vec<Candle>> {
    let klines: Vec<Kline> = serde_json::from_str(body)?;
    Ok(klines.into_iter().map(Candle::from).collect())
}
