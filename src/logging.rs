//! Tracing setup for tests and diagnostic tools
//!
//! The library itself only emits `tracing` events; embedding applications
//! install their own subscriber. This helper gives tests and small tools
//! an env-filtered console subscriber with one call.

use tracing_subscriber::EnvFilter;

/// Initialize a compact console subscriber, honoring `RUST_LOG`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .compact()
        .try_init();
}
