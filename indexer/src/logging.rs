//! Log output for the indexer binaries.
//!
//! The library crates log through the `log` facade; the trigger logs through
//! `tracing`. One `tracing-subscriber` formatter serves both, filtered by
//! `RUST_LOG` and defaulting to `info`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber, writing to stderr.
///
/// Calling this more than once keeps the first subscriber.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        // A subscriber is already installed.
    }
}
