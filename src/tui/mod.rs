//! Terminal user interface for the live chart.
//!
//! Ratatui-based: one screen with a price header, a status badge, error
//! banners and the close-price chart.

pub mod app;
pub mod components;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message, update};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
