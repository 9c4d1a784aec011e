//! Diagnostic logging for the CLI.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `LOCUS_LOG=locus_session=debug`.
pub const LOG_ENV: &str = "LOCUS_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber, writing to stderr so stdout stays machine-readable.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        eprintln!("warning: a log subscriber is already installed");
    }
}
