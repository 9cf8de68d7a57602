//! Tracing subscriber for welo.
//!
//! Diagnostics are written to stderr so that stdout only ever holds what a
//! command prints for the user (reports, parsed quantities, JSON).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the subscriber used by the `welo` binary.
///
/// Only warnings and errors are shown unless `RUST_LOG` asks for more, e.g.
/// `RUST_LOG=welo_core=debug` to see resolver decisions and data file access.
pub fn init() {
    init_with_level("warn")
}

/// Install a compact stderr subscriber filtered at `default_level`, or at
/// `RUST_LOG` when that is set.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level output captured by the test harness. Safe to call from
/// several tests.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
