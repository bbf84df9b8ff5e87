use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use btcpulse::config::{AppConfig, fetch_config};
use btcpulse::runtime::Runtime;
use btcpulse::tui::event::{spawn_event_reader, spawn_tick_timer};
use btcpulse::tui::{App, Message, Tui, render, restore_terminal, setup_terminal, update};
use btcpulse::{PulseError, Result};

const TICK_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<()> {
    let config = fetch_config()?;
    init_tracing(&config.log_file)?;
    info!(source = config.source.label(), "Starting btcpulse");

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &config).await;
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!("Exited with error: {e}");
    }
    result
}

/// Sends tracing output to a file; stdout belongs to the TUI.
fn init_tracing(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| PulseError::Io(format!("failed to open log file {}: {e}", path.display())))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("btcpulse=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run(terminal: &mut Tui, config: &AppConfig) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut app = App::new(config);
    let mut runtime = Runtime::new(config, tx.clone())?;

    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx, TICK_MS);

    for action in app.mount() {
        runtime.execute(action);
    }

    let outcome = loop {
        app.refresh_view();
        if let Err(e) = terminal.draw(|frame| render(frame, &app)) {
            break Err(PulseError::Io(format!("failed to draw frame: {e}")));
        }

        let Some(message) = rx.recv().await else {
            break Ok(());
        };
        dispatch(&mut app, &mut runtime, message);

        // Apply whatever queued up while drawing before the next frame.
        while let Ok(message) = rx.try_recv() {
            dispatch(&mut app, &mut runtime, message);
        }

        if app.should_quit {
            break Ok(());
        }
    };

    runtime.teardown().await;
    outcome
}

fn dispatch(app: &mut App, runtime: &mut Runtime, message: Message) {
    if let Some(action) = update(app, message) {
        runtime.execute(action);
    }
}
