//! Error types for core module
//!
//! Covers settings persistence and logging setup.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// No platform configuration directory could be resolved
    #[error("No configuration directory available")]
    NoConfigDir,

    /// The log filter directive did not parse
    #[error("Invalid log filter {filter:?}: {message}")]
    LogFilter { filter: String, message: String },

    /// A global subscriber was already installed
    #[error("Logging initialization failed: {message}")]
    LoggingInit { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
