//! Error and warning banners.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::tui::app::App;

/// Number of banner lines the current state needs.
pub fn height(app: &App) -> u16 {
    [
        app.fetch_error.is_some(),
        app.feed_warning.is_some(),
        app.notice.is_some(),
    ]
    .into_iter()
    .filter(|active| *active)
    .count() as u16
}

/// Renders one line per active banner, most severe first.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    if let Some(ref error) = app.fetch_error {
        lines.push(
            Line::from(format!(" ✖ {}  [x] dismiss", error.message))
                .style(Style::default().fg(Color::White).bg(Color::Red)),
        );
    }
    if let Some(ref warning) = app.feed_warning {
        lines.push(
            Line::from(format!(" ⚠ {}", warning.message))
                .style(Style::default().fg(Color::Black).bg(Color::Yellow)),
        );
    }
    if let Some(ref notice) = app.notice {
        lines.push(
            Line::from(format!(" ⚠ {}  [x] dismiss", notice.message))
                .style(Style::default().fg(Color::Yellow)),
        );
    }

    frame.render_widget(Paragraph::new(lines), area);
}
