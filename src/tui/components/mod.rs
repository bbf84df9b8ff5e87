//! Reusable pieces of the chart screen.

pub mod banner;
pub mod chart;
pub mod header;
pub mod status_bar;
