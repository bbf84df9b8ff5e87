//! The in-memory candle window.

use tracing::warn;

use crate::models::Candle;

/// How a live price is folded into the newest candle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatchMode {
    /// Overwrite `close` only. High and low can end up inside the close.
    #[default]
    CloseOnly,
    /// Overwrite `close` and widen `high`/`low` to include it.
    ExtendRange,
}

/// Ordered candle window owned by the app.
///
/// The window is only ever replaced wholesale by a snapshot or relay
/// frame; live prices touch the last candle and never change the length.
/// Every change bumps [`generation`](Self::generation), which is what
/// derived state keys its cache on.
#[derive(Debug, Clone, Default)]
pub struct CandleSeries {
    candles: Vec<Candle>,
    generation: u64,
}

impl CandleSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Identity of the current contents.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the whole window, keeping the delivered order.
    pub fn replace(&mut self, candles: Vec<Candle>) {
        if let Some(pos) = candles
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            warn!(
                index = pos + 1,
                timestamp = candles[pos + 1].timestamp,
                "Snapshot timestamps are not strictly increasing"
            );
        }

        self.candles = candles;
        self.generation += 1;
    }

    /// Applies a live price to the newest candle.
    ///
    /// Returns `false` and leaves the window untouched when it is empty.
    pub fn apply_price(&mut self, price: f64, mode: PatchMode) -> bool {
        let Some(last) = self.candles.last_mut() else {
            return false;
        };

        last.close = price;
        if mode == PatchMode::ExtendRange {
            last.high = last.high.max(price);
            last.low = last.low.min(price);
        }
        self.generation += 1;
        true
    }
}
