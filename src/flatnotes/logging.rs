//! Logging
//!
//! Structured logging with `tracing`, written to stderr so it never mixes with
//! command output on stdout.
//!
//! Filter precedence (highest first):
//! 1. `FLATNOTES_LOG`, then `RUST_LOG` (full `EnvFilter` syntax)
//! 2. `-v` (debug) / `-vv` (trace) on the command line
//! 3. `log_level` from the config file
//! 4. `warn`

use crate::error::{NoteError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV: &str = "FLATNOTES_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Resolve the filter directive from verbosity and the configured level.
pub fn level_for(verbosity: u8, configured: Option<&str>) -> String {
    match verbosity {
        0 => configured
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LEVEL)
            .to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

fn build_env_filter(verbosity: u8, configured: Option<&str>) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = level_for(verbosity, configured);
    EnvFilter::try_new(&level)
        .map_err(|e| NoteError::Api(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(verbosity: u8, configured: Option<&str>) -> Result<()> {
    let filter = build_env_filter(verbosity, configured)?;
    let _ = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbosity > 1)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
    Ok(())
}
