//! Tracing subscriber setup
//!
//! Logs go to stderr so they never interleave with the terminal board
//! on stdout. `RUST_LOG` wins over the configured filter.

use super::error::{CoreError, CoreResult};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber with `default_filter` unless `RUST_LOG` is set
pub fn init_logging(default_filter: &str) -> CoreResult<()> {
    let filter = build_filter(default_filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| CoreError::LoggingInit {
            message: e.to_string(),
        })
}

fn build_filter(default_filter: &str) -> CoreResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| CoreError::LogFilter {
            filter: default_filter.to_string(),
            message: e.to_string(),
        }),
    }
}
