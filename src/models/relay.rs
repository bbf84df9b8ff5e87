//! Relay feed model.
//!
//! The relay pushed the entire candle window on every message, so each
//! frame replaces local state rather than patching it.

use serde::{Deserialize, Serialize};

use super::Candle;

/// A full-window update pushed by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub candles: Vec<Candle>,
}

impl PriceUpdate {
    /// Parses a raw relay frame.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Json`](crate::PulseError::Json) if the frame does
    /// not match `{ "candles": [...] }`.
    pub fn parse(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
