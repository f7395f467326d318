//! Core error types for hostrun-core

use thiserror::Error;

/// Errors that end a run
///
/// Per-host and per-command failures are recorded as data and never show up
/// here.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Report sink could not be opened or written
    #[error("report sink error: {0}")]
    SinkError(#[from] std::io::Error),
}
