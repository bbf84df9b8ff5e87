//! Ticker stream model.

use serde::Deserialize;

use super::{PriceField, parse_price};

/// A 24h rolling ticker event. Only the last price is used; every other
/// field the exchange sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerMessage {
    #[serde(rename = "c")]
    current: PriceField,
}

impl TickerMessage {
    /// Parses a raw stream frame.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Json`](crate::PulseError::Json) if the frame is
    /// not JSON or lacks `c`, and
    /// [`PulseError::MalformedMessage`](crate::PulseError::MalformedMessage)
    /// if `c` is not a finite number.
    pub fn parse(text: &str) -> crate::Result<Self> {
        let message: Self = serde_json::from_str(text)?;
        message.price()?;
        Ok(message)
    }

    /// The current price carried by the message.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::MalformedMessage`](crate::PulseError::MalformedMessage)
    /// if the field is not a finite number.
    pub fn price(&self) -> crate::Result<f64> {
        parse_price(&self.current).map_err(crate::PulseError::MalformedMessage)
    }
}
