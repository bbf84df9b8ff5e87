//! Crate-level error types.
//!
//! [`PulseError`] unifies every error source (configuration, HTTP,
//! WebSocket, JSON, terminal I/O) behind a single enum so the snapshot
//! fetcher, the live feed and the TUI can all propagate with `?`.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PulseError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// An environment variable held a value that could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// The kline request failed in transport or returned a non-2xx status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A payload parsed as JSON but did not have the expected shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Terminal or log file I/O failed.
    #[error("io error: {0}")]
    Io(String),
}
