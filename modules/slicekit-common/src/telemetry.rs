//! Tracing setup for binaries and tests that embed slicekit.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "slicekit=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to
/// `slicekit=info`. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter()).try_init();
}

/// Same as [`init`] but emits JSON lines.
pub fn init_json() {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .try_init();
}
