//! Core module - configuration, logging and error types shared by the
//! client binaries
//!
//! - [`ClientSettings`] - persisted client preferences
//! - [`init_logging`] - tracing subscriber setup
//! - [`CoreError`] - failures of the above

pub mod error;
pub mod logging;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use settings::{ClientSettings, DEFAULT_LOG_FILTER, DEFAULT_SERVER_URL};
