//! Logging initialisation.
//!
//! `RUST_LOG` controls the filter, e.g. `RUST_LOG=emuconf_core=debug`.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global fmt subscriber. Defaults to `info` when `RUST_LOG`
/// is unset or invalid.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Installs a debug-level subscriber writing through the test harness.
/// Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
