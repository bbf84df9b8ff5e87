//! Live BTC/USDT terminal chart.
//!
//! Combines a periodically refreshed REST kline snapshot with a live ticker
//! stream: the stream's last price is merged into the close of the newest
//! candle, derived metrics are memoized per series revision, and the
//! result is drawn with ratatui.

pub mod config;
pub mod error;
pub mod market;
pub mod models;
pub mod rest;
pub mod runtime;
pub mod tui;
pub mod websocket;

pub use error::{PulseError, Result};
