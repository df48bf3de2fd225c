//! Logging initialization for `invdash`.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `INVDASH_LOG` environment variable. Falls back to the configured
//! `[logging] log_level` when the variable is unset or invalid.
//!
//! # Usage
//!
//! ```bash
//! # Reconciliation and drag/resize details
//! INVDASH_LOG=debug invdash show
//!
//! # Module-specific filtering
//! INVDASH_LOG=inventory_dashboard::preferences=debug,warn invdash show
//! ```

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "INVDASH_LOG";

/// Builds the filter from `INVDASH_LOG`, or from `fallback` when it is
/// unset or does not parse.
pub fn env_filter(fallback: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback.as_filter()))
}

/// Initialize the tracing subscriber, writing to stderr.
///
/// Stdout is left to command output. Calling this more than once is a no-op.
pub fn init(fallback: LogLevel) {
    let _ = fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
