//! Close-price line chart with a reference line at the current price.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::market::ChartRow;
use crate::tui::app::App;

/// Renders the chart panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.view();

    let block = Block::default()
        .title(format!(" {} · {} ", app.pair_label, app.interval))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if !view.has_data() {
        let placeholder = if app.loading {
            "Loading candles..."
        } else {
            "No candle data"
        };
        let para = Paragraph::new(placeholder)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(para, area);
        return;
    }

    let closes: Vec<(f64, f64)> = view
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| (i as f64, row.close))
        .collect();
    let x_max = (closes.len().saturating_sub(1)).max(1) as f64;

    let (mut low, mut high) = view.close_bounds.unwrap_or((0.0, 1.0));
    if let Some(price) = app.current_price {
        low = low.min(price);
        high = high.max(price);
    }
    let pad = ((high - low) * 0.05).max(high.abs() * 0.0005).max(0.01);
    let y_bounds = [low - pad, high + pad];

    let reference: Vec<(f64, f64)> = app
        .current_price
        .map(|price| vec![(0.0, price), (x_max, price)])
        .unwrap_or_default();

    let line_color = if view.metrics.is_up() {
        Color::Green
    } else {
        Color::Red
    };

    let mut datasets = vec![
        Dataset::default()
            .name("close")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(line_color))
            .data(&closes),
    ];
    if let Some(price) = app.current_price {
        datasets.push(
            Dataset::default()
                .name(format!("now {price:.2}"))
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Gray))
                .data(&reference),
        );
    }

    let axis_style = Style::default().fg(Color::DarkGray);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels(time_labels(&view.rows)),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(y_bounds)
                .labels(price_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

/// First, middle and last time labels.
fn time_labels(rows: &[ChartRow]) -> Vec<Span<'static>> {
    match rows {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.label.clone())],
        [first, .., last] => vec![
            Span::raw(first.label.clone()),
            Span::raw(rows[rows.len() / 2].label.clone()),
            Span::raw(last.label.clone()),
        ],
    }
}

fn price_labels([low, high]: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (low + high) / 2.0;
    [low, mid, high]
        .into_iter()
        .map(|price| Span::raw(format!("{price:.2}")))
        .collect()
}
