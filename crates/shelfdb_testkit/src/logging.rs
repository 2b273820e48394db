//! Tracing setup for tests.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber that writes through the test
/// harness, so log lines show up with the output of failing tests.
///
/// The filter comes from `RUST_LOG` and defaults to `shelfdb_core=debug`.
/// Calling this more than once is harmless; only the first call installs
/// a subscriber.
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelfdb_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
