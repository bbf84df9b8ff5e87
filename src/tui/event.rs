//! Event handling for the TUI.
//!
//! Every input (keys, timers, snapshot results, stream frames) arrives as
//! a [`Message`] on one channel and is applied by [`update`] on the main
//! task. Side effects are returned as [`Action`]s for the
//! [`Runtime`](crate::runtime::Runtime) to carry out.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::DataSource;
use crate::models::{Candle, PriceUpdate, TickerMessage};
use crate::websocket::FeedEvent;

use super::app::{App, Banner};

/// Terminal and timer events.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI animation.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// The snapshot poll timer fired.
    PollDue,
    /// A snapshot fetch finished.
    Snapshot(Result<Vec<Candle>, String>),

    /// Lifecycle or payload event from a stream transport.
    Feed { attempt: u64, event: FeedEvent },
    /// The reconnect delay elapsed.
    ReconnectDue,

    /// Request to quit the application.
    Quit,
}

/// Side effects requested by [`update`] or [`App::mount`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start the fixed-interval snapshot timer. Its first tick is immediate.
    StartPolling,
    /// Fetch a snapshot now.
    FetchSnapshot,
    /// Open a stream transport for this attempt.
    OpenFeed { attempt: u64 },
    /// Arm the one-shot reconnect timer.
    ScheduleReconnect,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            let polled = tokio::task::spawn_blocking(|| {
                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => event::read().ok(),
                    _ => None,
                }
            })
            .await;

            let message = match polled {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    Message::Input(Event::Key(key))
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => Message::Input(Event::Resize(w, h)),
                Ok(_) => continue,
                Err(_) => break,
            };

            if tx.send(message).is_err() {
                break;
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::PollDue => Some(Action::FetchSnapshot),
        Message::Snapshot(Ok(candles)) => {
            app.apply_snapshot(candles);
            None
        }
        Message::Snapshot(Err(error)) => {
            warn!(error = %error, "Snapshot fetch failed, keeping previous candles");
            app.apply_snapshot_error(&error);
            None
        }
        Message::Feed { attempt, event } => handle_feed_event(app, attempt, event),
        Message::ReconnectDue => {
            let attempt = app.feed.on_reconnect_due()?;
            info!(attempt, "Reconnecting live feed");
            Some(Action::OpenFeed { attempt })
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Applies one transport event, ignoring events from replaced attempts.
fn handle_feed_event(app: &mut App, attempt: u64, event: FeedEvent) -> Option<Action> {
    if !app.feed.is_current(attempt) {
        debug!(attempt, current = app.feed.attempt(), "Dropping event from stale feed");
        return None;
    }

    match event {
        FeedEvent::Opened => {
            app.feed.on_open(attempt);
            app.feed_warning = None;
            None
        }
        FeedEvent::Text(text) => {
            apply_feed_text(app, attempt, &text);
            None
        }
        FeedEvent::Error(error) => {
            app.feed_warning = Some(Banner::new(match app.source {
                DataSource::Direct => {
                    format!("Live feed error: {error} (candles still refresh on schedule)")
                }
                DataSource::Relay { .. } => format!("Relay feed error: {error}"),
            }));
            None
        }
        FeedEvent::Closed => {
            if !app.feed.on_close(attempt) {
                return None;
            }
            if app.feed_warning.is_none() {
                app.feed_warning = Some(Banner::new("Live feed disconnected, reconnecting"));
            }
            Some(Action::ScheduleReconnect)
        }
    }
}

/// Interprets a stream frame according to the data source. Frames that do
/// not parse are logged and dropped.
fn apply_feed_text(app: &mut App, attempt: u64, text: &str) {
    match app.source {
        DataSource::Direct => match TickerMessage::parse(text).and_then(|msg| msg.price()) {
            Ok(price) => {
                if !app.apply_live_price(price) {
                    debug!(price, "No candles yet, ticker price not applied");
                }
            }
            Err(e) => warn!(attempt, error = %e, "Dropping malformed ticker message"),
        },
        DataSource::Relay { .. } => match PriceUpdate::parse(text) {
            Ok(update) => app.apply_snapshot(update.candles),
            Err(e) => warn!(attempt, error = %e, "Dropping malformed relay message"),
        },
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.pulse = !app.pulse;
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('x') | KeyCode::Esc => {
            app.dismiss_banners();
            None
        }
        KeyCode::Char('r') if app.source == DataSource::Direct => Some(Action::FetchSnapshot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::market::ConnectionState;

    fn direct_app() -> App {
        App::new(&AppConfig::from_lookup(|_| None).unwrap())
    }

    fn relay_app() -> App {
        let config = AppConfig::from_lookup(|name| match name {
            "BTCPULSE_SOURCE" => Some("relay".to_string()),
            "BTCPULSE_RELAY_URL" => Some("ws://127.0.0.1:3001/ws".to_string()),
            _ => None,
        })
        .unwrap();
        App::new(&config)
    }

    fn candle(timestamp: u64, close: f64) -> Candle {
        Candle {
            timestamp,
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close,
            volume: 10.0,
        }
    }

    fn feed(attempt: u64, event: FeedEvent) -> Message {
        Message::Feed { attempt, event }
    }

    fn key(code: KeyCode) -> Message {
        Message::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn mount_starts_polling_and_first_feed() {
        let mut app = direct_app();
        let actions = app.mount();
        assert_eq!(
            actions,
            vec![Action::StartPolling, Action::OpenFeed { attempt: 1 }]
        );
        assert_eq!(app.feed.state(), ConnectionState::Connecting);
    }

    #[test]
    fn relay_mount_does_not_poll() {
        let mut app = relay_app();
        assert_eq!(app.mount(), vec![Action::OpenFeed { attempt: 1 }]);
    }

    #[test]
    fn poll_tick_requests_fetch() {
        let mut app = direct_app();
        assert_eq!(update(&mut app, Message::PollDue), Some(Action::FetchSnapshot));
    }

    #[test]
    fn snapshot_replaces_window_and_sets_price() {
        let mut app = direct_app();
        app.mount();
        update(
            &mut app,
            Message::Snapshot(Ok(vec![candle(1000, 100.0), candle(2000, 110.0)])),
        );

        assert!(!app.loading);
        assert_eq!(app.series.len(), 2);
        assert_eq!(app.current_price, Some(110.0));
        let view = app.refresh_view();
        assert_eq!(view.metrics.price_change, 10.0);
        assert_eq!(view.metrics.percent_label(), "10.00");
    }

    #[test]
    fn failed_snapshot_keeps_previous_window() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, Message::Snapshot(Ok(vec![candle(1000, 105.0)])));
        update(&mut app, Message::Snapshot(Err("HTTP 500".to_string())));

        assert_eq!(app.series.len(), 1);
        assert_eq!(app.current_price, Some(105.0));
        assert!(app.fetch_error.as_ref().unwrap().message.contains("HTTP 500"));

        update(&mut app, key(KeyCode::Char('x')));
        assert!(app.fetch_error.is_none());
    }

    #[test]
    fn successful_snapshot_clears_fetch_error() {
        let mut app = direct_app();
        update(&mut app, Message::Snapshot(Err("timeout".to_string())));
        assert!(app.fetch_error.is_some());
        update(&mut app, Message::Snapshot(Ok(vec![candle(1000, 1.0)])));
        assert!(app.fetch_error.is_none());
    }

    #[test]
    fn ticker_patches_last_close_only() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, feed(1, FeedEvent::Opened));
        update(&mut app, Message::Snapshot(Ok(vec![candle(1000, 105.0)])));

        update(&mut app, feed(1, FeedEvent::Text(r#"{"c":"123.45"}"#.to_string())));

        let last = app.series.last().unwrap();
        assert_eq!(last.close, 123.45);
        assert_eq!(last.open, 100.0);
        assert_eq!(last.high, 110.0);
        assert_eq!(last.low, 90.0);
        assert_eq!(last.volume, 10.0);
        assert_eq!(last.timestamp, 1000);
        assert_eq!(app.current_price, Some(123.45));
    }

    #[test]
    fn ticker_before_snapshot_is_noop() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, feed(1, FeedEvent::Text(r#"{"c":"50.0"}"#.to_string())));
        assert!(app.series.is_empty());
        assert_eq!(app.current_price, None);
    }

    #[test]
    fn malformed_ticker_is_dropped_silently() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, Message::Snapshot(Ok(vec![candle(1000, 105.0)])));
        let generation = app.series.generation();

        update(&mut app, feed(1, FeedEvent::Text("not json".to_string())));
        update(&mut app, feed(1, FeedEvent::Text(r#"{"c":"abc"}"#.to_string())));
        update(&mut app, feed(1, FeedEvent::Text(r#"{"e":"24hrTicker"}"#.to_string())));

        assert_eq!(app.series.generation(), generation);
        assert_eq!(app.series.last().unwrap().close, 105.0);
        assert!(app.feed_warning.is_none());
        assert!(app.fetch_error.is_none());
    }

    #[test]
    fn close_schedules_exactly_one_reconnect() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, feed(1, FeedEvent::Opened));

        assert_eq!(update(&mut app, feed(1, FeedEvent::Error("reset".into()))), None);
        assert_eq!(
            update(&mut app, feed(1, FeedEvent::Closed)),
            Some(Action::ScheduleReconnect)
        );
        assert_eq!(update(&mut app, feed(1, FeedEvent::Closed)), None);
        assert!(app.feed_warning.as_ref().unwrap().message.contains("reset"));
        assert_eq!(app.feed.state(), ConnectionState::ClosedPendingReconnect);
    }

    #[test]
    fn reconnect_success_clears_warning() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, feed(1, FeedEvent::Opened));
        update(&mut app, feed(1, FeedEvent::Closed));
        assert!(app.feed_warning.is_some());

        assert_eq!(
            update(&mut app, Message::ReconnectDue),
            Some(Action::OpenFeed { attempt: 2 })
        );
        update(&mut app, feed(2, FeedEvent::Opened));

        assert!(app.feed_warning.is_none());
        assert_eq!(app.feed.state(), ConnectionState::Open);
    }

    #[test]
    fn reconnect_timer_is_noop_when_already_connecting() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, feed(1, FeedEvent::Closed));
        update(&mut app, Message::ReconnectDue);

        assert_eq!(update(&mut app, Message::ReconnectDue), None);
        assert_eq!(app.feed.attempt(), 2);
    }

    #[test]
    fn stale_attempt_cannot_schedule_reconnect() {
        let mut app = direct_app();
        app.mount();
        update(&mut app, feed(1, FeedEvent::Closed));
        update(&mut app, Message::ReconnectDue);
        update(&mut app, feed(2, FeedEvent::Opened));

        assert_eq!(update(&mut app, feed(1, FeedEvent::Closed)), None);
        assert_eq!(update(&mut app, feed(1, FeedEvent::Text(r#"{"c":"1"}"#.into()))), None);
        assert_eq!(app.feed.state(), ConnectionState::Open);
    }

    #[test]
    fn relay_frame_replaces_window() {
        let mut app = relay_app();
        app.mount();
        update(&mut app, feed(1, FeedEvent::Opened));
        let frame = r#"{"candles":[
            {"timestamp":1000,"open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":3.0},
            {"timestamp":2000,"open":1.5,"high":2.5,"low":1.0,"close":2.0,"volume":4.0}
        ]}"#;
        update(&mut app, feed(1, FeedEvent::Text(frame.to_string())));

        assert_eq!(app.series.len(), 2);
        assert_eq!(app.current_price, Some(2.0));
        assert!(!app.loading);
    }

    #[test]
    fn refresh_key_only_in_direct_mode() {
        let mut app = direct_app();
        assert_eq!(update(&mut app, key(KeyCode::Char('r'))), Some(Action::FetchSnapshot));

        let mut relay = relay_app();
        assert_eq!(update(&mut relay, key(KeyCode::Char('r'))), None);
    }

    #[test]
    fn quit_key_sets_flag() {
        let mut app = direct_app();
        update(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn view_is_not_rebuilt_between_unchanged_renders() {
        let mut app = direct_app();
        update(&mut app, Message::Snapshot(Ok(vec![candle(1000, 100.0)])));
        let first = app.refresh_view();
        update(&mut app, Message::Input(Event::Tick));
        update(&mut app, Message::Input(Event::Tick));
        let second = app.refresh_view();

        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(app.view_recomputes(), 1);
    }
}
