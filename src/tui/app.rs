//! Application state for the TUI.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{AppConfig, DataSource};
use crate::market::{
    CandleSeries, ConnectionState, DerivedCache, DerivedView, LiveFeed, PatchMode,
};
use crate::models::Candle;

use super::event::Action;

/// Central application state container.
///
/// Owned by the main task and mutated only through [`update`](super::event::update),
/// so every handler sees a consistent window.
pub struct App {
    // -- Source --
    /// Where candles and prices come from.
    pub source: DataSource,
    /// Display name of the followed pair.
    pub pair_label: String,
    /// Kline interval shown in the chart title.
    pub interval: String,
    /// Whether live prices also widen high/low.
    pub patch_mode: PatchMode,

    // -- Market State --
    /// Candle window, replaced by snapshots and patched by the stream.
    pub series: CandleSeries,
    /// Last known price from either channel.
    pub current_price: Option<f64>,
    /// Streaming connection state machine.
    pub feed: LiveFeed,

    // -- Status --
    /// `true` until the first snapshot attempt finishes.
    pub loading: bool,
    /// Snapshot failure, dismissible.
    pub fetch_error: Option<Banner>,
    /// Live-feed trouble, cleared when the stream reopens.
    pub feed_warning: Option<Banner>,
    /// Startup notice (e.g. relay requested but disabled).
    pub notice: Option<Banner>,
    /// Toggled every tick to animate the live badge.
    pub pulse: bool,

    // -- Internal --
    derived: DerivedCache,
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app state for the given configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            source: config.source.clone(),
            pair_label: pair_label(&config.exchange.symbol),
            interval: config.exchange.interval.clone(),
            patch_mode: config.patch_mode,

            series: CandleSeries::new(),
            current_price: None,
            feed: LiveFeed::new(),

            loading: true,
            fetch_error: None,
            feed_warning: None,
            notice: config.startup_warning.clone().map(Banner::new),
            pulse: false,

            derived: DerivedCache::new(),
            should_quit: false,
        }
    }

    /// Actions that bring the app up: snapshot polling (direct source
    /// only) and the first stream connection.
    pub fn mount(&mut self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(2);
        if self.source == DataSource::Direct {
            actions.push(Action::StartPolling);
        }
        actions.push(Action::OpenFeed {
            attempt: self.feed.start(),
        });
        actions
    }

    /// Replaces the candle window with a fresh snapshot.
    pub fn apply_snapshot(&mut self, candles: Vec<Candle>) {
        if let Some(last) = candles.last() {
            self.current_price = Some(last.close);
        }
        self.series.replace(candles);
        self.loading = false;
        self.fetch_error = None;
    }

    /// Records a failed snapshot. The previous window stays on screen.
    pub fn apply_snapshot_error(&mut self, error: &str) {
        self.loading = false;
        self.fetch_error = Some(Banner::new(format!("Failed to fetch candles: {error}")));
    }

    /// Overlays a live price on the newest candle.
    ///
    /// Returns `false` (and changes nothing) while the window is empty.
    pub fn apply_live_price(&mut self, price: f64) -> bool {
        if !self.series.apply_price(price, self.patch_mode) {
            return false;
        }
        self.current_price = Some(price);
        true
    }

    /// Clears every dismissible banner.
    pub fn dismiss_banners(&mut self) {
        self.fetch_error = None;
        self.notice = None;
    }

    /// Brings the derived view up to date with the window. Cheap when the
    /// window has not changed.
    pub fn refresh_view(&mut self) -> Arc<DerivedView> {
        self.derived.get(&self.series)
    }

    /// The derived view as of the last [`refresh_view`](Self::refresh_view).
    pub fn view(&self) -> &DerivedView {
        self.derived.current()
    }

    /// How many times the derived view has been rebuilt.
    pub fn view_recomputes(&self) -> u64 {
        self.derived.recomputes()
    }

    /// What the status badge should show.
    pub fn indicator(&self) -> Indicator {
        if self.fetch_error.is_some() && self.series.is_empty() {
            return Indicator::Error;
        }
        if self.loading {
            return Indicator::Loading;
        }
        match self.feed.state() {
            ConnectionState::Connecting => Indicator::Connecting,
            ConnectionState::Open => Indicator::Live,
            ConnectionState::ClosedPendingReconnect => Indicator::Reconnecting,
        }
    }
}

/// Status badge states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    Loading,
    Connecting,
    Live,
    Reconnecting,
    Error,
}

impl Indicator {
    /// Returns a display string for the badge.
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Loading => "LOADING",
            Indicator::Connecting => ConnectionState::Connecting.label(),
            Indicator::Live => ConnectionState::Open.label(),
            Indicator::Reconnecting => ConnectionState::ClosedPendingReconnect.label(),
            Indicator::Error => "ERROR",
        }
    }
}

/// Message shown in a banner line.
#[derive(Clone, Debug)]
pub struct Banner {
    pub message: String,
    /// When the banner was raised.
    pub raised_at: Instant,
}

impl Banner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raised_at: Instant::now(),
        }
    }
}

/// `BTCUSDT` → `BTC/USDT` for the quote assets this chart can meet.
fn pair_label(symbol: &str) -> String {
    ["USDT", "USDC", "BUSD", "USD"]
        .iter()
        .find_map(|quote| {
            symbol
                .strip_suffix(quote)
                .filter(|base| !base.is_empty())
                .map(|base| format!("{base}/{quote}"))
        })
        .unwrap_or_else(|| symbol.to_string())
}
