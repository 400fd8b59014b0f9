//! Tracing setup for binaries built on Twentyq.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a `fmt` subscriber on stderr, filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed, which
/// leaves the existing one in place.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
