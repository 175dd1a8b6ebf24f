//! Tracing subscriber wiring.
//!
//! All spans and events emitted by the `report` and `github` crates flow
//! through the subscriber installed here. Output always goes to stderr so it
//! never mixes with the report on stdout. Verbosity follows `RUST_LOG`
//! (default `warn`).

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::args::LogFormat;

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    // A subscriber may already be installed (e.g. by a test harness).
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
