//! Structured logging infrastructure for the loyalty system.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logging system with structured output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use loyalty_core::logging;
///
/// logging::init();
/// tracing::info!("Member archive opened");
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .init();
}

/// Initialize the logging system with JSON output for production environments.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
///
/// # Example
/// ```no_run
/// use loyalty_core::logging;
///
/// logging::init_json();
/// tracing::info!(service = "bonus-archive", "Promotion sweep scheduled");
/// ```
pub fn init_json() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_target(true).with_thread_ids(true))
        .init();
}

/// Try to install the human-readable subscriber, ignoring the error raised
/// when a global subscriber is already set. Intended for tests.
pub fn try_init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_is_repeatable() {
        // Global subscriber can only be set once per process
        try_init();
        try_init();
        tracing::info!("logging initialised twice without panic");
    }

    #[test]
    fn test_default_filter_parses() {
        let _ = EnvFilter::new(DEFAULT_FILTER);
    }
}
