//! Live-feed connection state machine.
//!
//! ```text
//! Connecting ──open──▶ Open ──close──▶ ClosedPendingReconnect
//!     ▲                                        │
//!     └──────────── reconnect timer ───────────┘
//! ```
//!
//! Every transport is tagged with an attempt number. Events from an
//! attempt that is no longer current are ignored, so a late close from a
//! replaced socket cannot schedule a second reconnect.

/// Lifecycle of the streaming connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Open,
    ClosedPendingReconnect,
}

impl ConnectionState {
    /// Returns a display string for the state.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Open => "LIVE",
            ConnectionState::ClosedPendingReconnect => "RECONNECTING",
        }
    }
}

/// Tracks which transport attempt is current and whether a reconnect is due.
#[derive(Debug, Default)]
pub struct LiveFeed {
    state: ConnectionState,
    attempt: u64,
    reconnects: u64,
}

impl LiveFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The attempt number of the current transport, `0` before the first.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// How many reconnect attempts have been started.
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    pub fn is_current(&self, attempt: u64) -> bool {
        attempt != 0 && attempt == self.attempt
    }

    /// Starts the first connection and returns its attempt number.
    pub fn start(&mut self) -> u64 {
        self.attempt += 1;
        self.state = ConnectionState::Connecting;
        self.attempt
    }

    /// Records that `attempt` finished its handshake.
    ///
    /// Returns `false` for stale attempts.
    pub fn on_open(&mut self, attempt: u64) -> bool {
        if !self.is_current(attempt) {
            return false;
        }
        self.state = ConnectionState::Open;
        true
    }

    /// Records that `attempt` closed.
    ///
    /// Returns `true` exactly when the caller must schedule a reconnect:
    /// the attempt is current and no reconnect is already pending.
    pub fn on_close(&mut self, attempt: u64) -> bool {
        if !self.is_current(attempt) || self.state == ConnectionState::ClosedPendingReconnect {
            return false;
        }
        self.state = ConnectionState::ClosedPendingReconnect;
        true
    }

    /// Called when the reconnect timer fires.
    ///
    /// Returns the new attempt number to open, or `None` if a connection
    /// is already in flight or open.
    pub fn on_reconnect_due(&mut self) -> Option<u64> {
        if self.state != ConnectionState::ClosedPendingReconnect {
            return None;
        }
        self.attempt += 1;
        self.reconnects += 1;
        self.state = ConnectionState::Connecting;
        Some(self.attempt)
    }
}
