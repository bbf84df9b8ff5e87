//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};

use super::app::App;
use super::components::{banner, chart, header, status_bar};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                  // Price header
            Constraint::Length(1),                  // Status bar
            Constraint::Length(banner::height(app)), // Banners
            Constraint::Min(5),                     // Chart
            Constraint::Length(1),                  // Keybindings help
        ])
        .split(frame.area());

    header::render(frame, layout[0], app);
    status_bar::render(frame, layout[1], app);
    banner::render(frame, layout[2], app);
    chart::render(frame, layout[3], app);
    render_keybindings(frame, layout[4]);
}

/// Renders the keybindings help line.
fn render_keybindings(frame: &mut Frame, area: ratatui::layout::Rect) {
    let help = "[r]efresh  [x]dismiss  [q]uit";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
