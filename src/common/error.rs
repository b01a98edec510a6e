//! Error types for the request driver
//!
//! Every failure propagates to the caller. A failed case aborts the rest of
//! the run; nothing here is retried or skipped.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the driver
#[derive(Error, Debug)]
pub enum Error {
    // === Connection Errors ===
    #[error("Failed to connect to {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("{phase} timed out after {secs} seconds")]
    Timeout { phase: &'static str, secs: u64 },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario: {0}")]
    Scenario(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a connection error for the given target address
    pub fn connect_failed(addr: &str, source: io::Error) -> Self {
        Self::ConnectFailed {
            addr: addr.to_string(),
            source,
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Whether this error came from establishing the connection
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::ConnectFailed { .. })
    }
}
