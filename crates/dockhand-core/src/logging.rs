//! Tracing bootstrap.
//!
//! Configure via the `RUST_LOG` environment variable, for example
//! `RUST_LOG=dockhand=debug` or `RUST_LOG=dockhand::drag=trace`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "dockhand=info,dockhand_core=info";

/// Install a global fmt subscriber honouring `RUST_LOG`.
///
/// Panics if a global subscriber is already installed; use [`try_init`] in
/// code that may run more than once (tests, plugins).
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_target(true)
        .init();
}

/// Install a global fmt subscriber with an explicit filter directive.
pub fn init_with_filter(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .init();
}

/// Like [`init`], but returns an error instead of panicking when a global
/// subscriber already exists.
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_target(true)
        .try_init()
}

/// Subscriber for tests: output goes through the test harness capture.
pub fn try_init_for_tests() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("dockhand=debug"))
        .with_test_writer()
        .try_init()
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
