//! Logging setup.
//!
//! Events go to stderr so stdout stays clean for reports and CSV output.
//! `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=cylcost=debug`.

use tracing_subscriber::{EnvFilter, fmt};

/// Default filter: only problems; artifact loads and zero-fills need `RUST_LOG`.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber for the binary.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Subscriber for tests; safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
