//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::{App, Indicator};

/// Renders the status bar: connection badge, data source, window size.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let indicator = app.indicator();
    let badge_color = match indicator {
        Indicator::Live => Color::Green,
        Indicator::Loading | Indicator::Connecting | Indicator::Reconnecting => Color::Yellow,
        Indicator::Error => Color::Red,
    };

    // The live badge breathes with the UI tick; other states stay solid.
    let (dot, modifier) = match (indicator, app.pulse) {
        (Indicator::Live, true) => ("●", Modifier::BOLD),
        (Indicator::Live, false) => ("○", Modifier::DIM),
        _ => ("●", Modifier::BOLD),
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {dot} {} ", indicator.label()),
            Style::default().fg(badge_color).add_modifier(modifier),
        ),
        Span::raw("│"),
        Span::styled(
            format!(" source: {} ", app.source.label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("│"),
        Span::raw(format!(" {} candles ", app.series.len())),
        Span::raw("│"),
        Span::styled(
            format!(" reconnects: {} ", app.feed.reconnects()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
