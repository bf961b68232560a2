//! Diagnostic logging setup.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `SIFT_LOG=sift_index=debug`.
pub const LOG_ENV: &str = "SIFT_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber filtered by [`LOG_ENV`].
///
/// Stdout stays reserved for command output.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .without_time()
        .init();
}
