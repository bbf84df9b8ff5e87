//! Wire models for the exchange REST klines, the ticker stream, and the
//! legacy relay feed.
//!
//! Exchange payloads carry prices as decimal strings; [`parse_price`]
//! accepts either a string or a bare JSON number so fixtures and relay
//! payloads can use plain numbers.

pub mod candle;
pub mod relay;
pub mod ticker;

pub use candle::{Candle, Kline};
pub use relay::PriceUpdate;
pub use ticker::TickerMessage;

use serde::Deserialize;

/// A price field as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum PriceField {
    Text(String),
    Number(f64),
}

/// Converts a wire price field to `f64`, rejecting non-finite values.
pub(crate) fn parse_price(field: &PriceField) -> Result<f64, String> {
    let value = match field {
        PriceField::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid numeric string `{text}`: {e}"))?,
        PriceField::Number(number) => *number,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("non-finite price `{value}`"))
    }
}
