//! Logging setup for fuzzmatch hosts.
//!
//! The core crate only emits events; installing a subscriber is left to the
//! host process.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` says nothing
pub const DEFAULT_FILTER: &str = "info,fuzzmatch_core=info";

/// Install the global subscriber with [`DEFAULT_FILTER`].
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global subscriber, falling back to `default_filter` when
/// `RUST_LOG` is unset or unparsable.
///
/// Events print one per line in the compact fmt layout. Calling this after a
/// subscriber is installed leaves the existing one in place.
pub fn init_with_filter(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(filter(default_filter))
        .with(fmt::layer().compact())
        .try_init();
}

fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_with_filter("fuzzmatch_core=debug");
        init();
        tracing::info!(target: "fuzzmatch_core", "still logging");
    }
}
