//! Logging setup shared by the `sleepq` binary and the test suite.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at INFO, overridable through `RUST_LOG`.
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific default level
///
/// `RUST_LOG` still wins when it is set. Output uses the compact
/// formatter so log lines don't crowd the report text on stdout.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route logs through the test harness so they show up on failure only
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
