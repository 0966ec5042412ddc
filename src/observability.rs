//! Logging setup
//!
//! Installs a `tracing` fmt subscriber. `RUST_LOG` takes precedence over the
//! filter from configuration.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Returns false if a subscriber was already installed (e.g. by a test
/// harness); the existing one is kept.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_keeps_first_subscriber() {
        let _ = init_tracing("debug");
        assert!(!init_tracing("not a valid filter ["));
    }
}
