//! # Logging
//!
//! `tracing` subscriber setup: an `EnvFilter` plus either compact text or
//! JSON lines.

use crate::config::LoggingConfig;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Noisy HTTP stack modules, capped at `info` when a bare level is given.
const QUIET_MODULES: &str = "h2=info,hyper=info,hyper_util=info,reqwest=info";

/// Builds the filter spec for `log_level`.
///
/// A bare level such as `"debug"` gets the [`QUIET_MODULES`] overrides.
/// Directive strings containing `,` or `=` are used as they are.
#[must_use]
pub fn filter_spec(log_level: &str) -> String {
    let normalized = log_level.trim();
    if normalized.is_empty() {
        format!("info,{QUIET_MODULES}")
    } else if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!("{normalized},{QUIET_MODULES}")
    }
}

/// Installs the global subscriber.
///
/// An unparsable filter falls back to `info`. Calling this twice is harmless:
/// the second subscriber is not installed.
pub fn setup_logging(log_level: &str, json_format: bool) {
    let spec = filter_spec(log_level);
    let filter = EnvFilter::from_str(&spec).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    let installed = if json_format {
        let json_layer = fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(false);
        subscriber.with(json_layer).try_init().is_ok()
    } else {
        let fmt_layer = fmt::layer().with_target(true).compact();
        subscriber.with(fmt_layer).try_init().is_ok()
    };

    if installed {
        tracing::info!(
            filter = %spec,
            format = if json_format { "json" } else { "compact" },
            "Logging initialized"
        );
    }
}

/// [`setup_logging`] from the `[logging]` settings.
pub fn setup_from_config(config: &LoggingConfig) {
    setup_logging(&config.level, config.json);
}
