//! Log output for hosts and tests.
//!
//! The library only emits `tracing` events: dropped guarded keys and relation
//! registration at `debug`, snapshot syncs at `trace`, `Collection::dump` at
//! `info` on the `restive::collection` target. Nothing is printed until a
//! subscriber is installed, either by the host application or with [`init`].
//!
//! Filtering follows `RUST_LOG`, e.g. `RUST_LOG=restive=debug` or
//! `RUST_LOG=restive::collection=info`.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` when the variable is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_with(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// [`init_with`] defaulting to warnings only.
pub fn init() -> bool {
    init_with("warn")
}
