//! Price header component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::App;

/// Renders pair, current price and window change.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.pair_label),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match app.current_price {
        Some(price) => spans.push(Span::styled(
            format!(" {price:.2} "),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled(" -- ", Style::default().fg(Color::DarkGray))),
    }

    let view = app.view();
    if view.has_data() {
        let metrics = view.metrics;
        let (arrow, color) = if metrics.is_up() {
            ("▲", Color::Green)
        } else {
            ("▼", Color::Red)
        };
        let sign = if metrics.price_change_percent > 0.0 { "+" } else { "" };

        spans.push(Span::styled(arrow, Style::default().fg(color)));
        spans.push(Span::styled(
            format!(
                " {} ({sign}{}%) ",
                metrics.change_label(),
                metrics.percent_label()
            ),
            Style::default().fg(color),
        ));
        spans.push(Span::styled(
            format!("over {} × {}", view.rows.len(), app.interval),
            Style::default().fg(Color::Gray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(para, area);
}
