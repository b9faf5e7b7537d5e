//! Tracing subscriber setup.
//!
//! Outbox is embedded as a library, so the hosting application decides when
//! to install the subscriber. `RUST_LOG` takes precedence over the
//! configured level.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::logging::LoggingConfig;

/// Install the global tracing subscriber from configuration.
///
/// Calling this twice panics inside `tracing_subscriber`; embedding
/// applications that install their own subscriber should skip it.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }

    tracing::debug!(level = %config.level, format = %config.format, "Logging initialized");
}
