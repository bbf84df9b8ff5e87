//! Terminal setup and teardown utilities.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{PulseError, Result};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enables raw mode and switches to the alternate screen buffer.
///
/// # Errors
///
/// Returns [`PulseError::Io`] if stdout is not a TTY or the terminal
/// cannot be switched. Raw mode is rolled back on partial failure.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(PulseError::Io(
            "the chart needs an interactive terminal (TTY)".to_string(),
        ));
    }

    enable_raw_mode().map_err(|e| io_error("failed to enable raw mode", e))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(io_error("failed to enter alternate screen", e));
    }

    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        let _ = disable_raw_mode();
        io_error("failed to create terminal", e)
    })
}

/// Leaves the alternate screen, disables raw mode and shows the cursor.
///
/// # Errors
///
/// Returns [`PulseError::Io`] if any restoration step fails.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| io_error("failed to disable raw mode", e))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| io_error("failed to leave alternate screen", e))?;
    terminal
        .show_cursor()
        .map_err(|e| io_error("failed to show cursor", e))?;
    Ok(())
}

fn io_error(context: &str, e: io::Error) -> PulseError {
    PulseError::Io(format!("{context}: {e}"))
}
