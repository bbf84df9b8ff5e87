//! Client-side market state: the candle window, the live-feed connection
//! state machine, and the memoized view derived from the window.
//!
//! Nothing in here performs I/O. The TUI event loop feeds these types and
//! the [`runtime`](crate::runtime) carries out whatever side effects they
//! ask for.

pub mod derive;
pub mod feed;
pub mod series;

pub use derive::{ChartRow, DerivedCache, DerivedMetrics, DerivedView};
pub use feed::{ConnectionState, LiveFeed};
pub use series::{CandleSeries, PatchMode};
