//! Log output for the binary
//!
//! Everything goes to stderr so stdout carries only the rendered frame and
//! the sent message list.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "SMSD_LOG";

const DEFAULT_FILTER: &str = "info";

/// Installs the global fmt subscriber
///
/// A second call keeps the first subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
