//! Subscriber setup for hosts embedding the simulator.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the host (binary, Python module, test harness).

use std::str::FromStr;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::error::{GrowthError, Result};

/// Build the filter directive string for `log_level`.
///
/// A bare level (e.g. `"debug"`) applies to this crate only and keeps
/// everything else at `warn`. Directive strings (containing `,` or `=`) are
/// passed through unchanged.
pub fn filter_directives(log_level: &str) -> String {
    let normalized = log_level.trim();
    if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else if normalized.is_empty() {
        "warn,fasttrack=info".to_string()
    } else {
        format!("warn,fasttrack={normalized}")
    }
}

/// Install a global subscriber.
///
/// Fails if the filter is malformed or a global subscriber is already set.
pub fn setup_logging(log_level: &str, json_format: bool) -> Result<()> {
    let directives = filter_directives(log_level);
    let filter = EnvFilter::from_str(&directives).map_err(|e| GrowthError::Logging {
        message: format!("bad filter `{directives}`: {e}"),
    })?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json_format {
        registry
            .with(fmt::layer().json().with_target(false).with_current_span(false))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true).compact()).try_init()
    };
    installed.map_err(|e| GrowthError::Logging { message: e.to_string() })?;

    tracing::info!(
        filter = %directives,
        format = if json_format { "json" } else { "compact" },
        "Logging initialized"
    );
    Ok(())
}
