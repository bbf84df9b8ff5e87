//! Chart rows and price-change metrics derived from the candle window.
//!
//! Deriving is cheap but not free, and the chart widget redraws on every
//! UI tick. [`DerivedCache`] keys the derived view on the window's
//! generation so redraws that follow no data change reuse the same
//! [`Arc`].

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};

use super::series::CandleSeries;
use crate::models::Candle;

/// One chart-ready point.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    /// Wall-clock `HH:MM` label for the axis.
    pub label: String,
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Change from the first to the last close of the window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedMetrics {
    pub price_change: f64,
    /// Percent of the first close. Exactly `0.0` when the window has at
    /// most one candle or the first close is zero.
    pub price_change_percent: f64,
}

impl DerivedMetrics {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
            return Self::default();
        };
        if candles.len() < 2 {
            return Self::default();
        }

        let price_change = last.close - first.close;
        let price_change_percent = if first.close == 0.0 {
            0.0
        } else {
            price_change / first.close * 100.0
        };

        Self {
            price_change,
            price_change_percent,
        }
    }

    /// Percent change with two decimals, e.g. `"10.00"`.
    pub fn percent_label(&self) -> String {
        format!("{:.2}", normalize_zero(self.price_change_percent))
    }

    /// Absolute change with two decimals and an explicit sign.
    pub fn change_label(&self) -> String {
        format!("{:+.2}", normalize_zero(self.price_change))
    }

    pub fn is_up(&self) -> bool {
        self.price_change >= 0.0
    }
}

/// Everything the chart needs from one version of the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedView {
    pub rows: Vec<ChartRow>,
    pub metrics: DerivedMetrics,
    /// Lowest and highest close, `None` for an empty window.
    pub close_bounds: Option<(f64, f64)>,
}

impl DerivedView {
    /// Derives a view with local-time labels.
    pub fn from_candles(candles: &[Candle]) -> Self {
        Self::from_candles_in(candles, &Local)
    }

    /// Derives a view with labels rendered in `tz`.
    pub fn from_candles_in<Tz>(candles: &[Candle], tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let rows = candles
            .iter()
            .map(|c| ChartRow {
                label: format_time_label(c.timestamp, tz),
                timestamp: c.timestamp,
                open: c.open,
                high: c.high,
                low: c.low,
                close: c.close,
                volume: c.volume,
            })
            .collect();

        let close_bounds = candles.iter().map(|c| c.close).fold(None, |acc, close| {
            Some(match acc {
                None => (close, close),
                Some((lo, hi)) => (f64::min(lo, close), f64::max(hi, close)),
            })
        });

        Self {
            rows,
            metrics: DerivedMetrics::from_candles(candles),
            close_bounds,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// Memoizes the [`DerivedView`] of a [`CandleSeries`].
#[derive(Debug, Default)]
pub struct DerivedCache {
    generation: Option<u64>,
    view: Arc<DerivedView>,
    recomputes: u64,
}

impl DerivedCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view for `series`, recomputing only if the series
    /// changed since the last call.
    pub fn get(&mut self, series: &CandleSeries) -> Arc<DerivedView> {
        if self.generation != Some(series.generation()) {
            self.view = Arc::new(DerivedView::from_candles(series.candles()));
            self.generation = Some(series.generation());
            self.recomputes += 1;
        }
        Arc::clone(&self.view)
    }

    /// The most recently derived view, without checking for changes.
    pub fn current(&self) -> &Arc<DerivedView> {
        &self.view
    }

    /// How many times the view has been rebuilt.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }
}

/// Formats an epoch-millisecond timestamp as `HH:MM` in `tz`.
pub fn format_time_label<Tz>(timestamp_ms: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| utc.with_timezone(tz).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

// -0.0 would print as "-0.00".
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
