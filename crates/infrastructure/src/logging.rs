//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset; it keeps the per-exchange
/// request and response lines.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global subscriber: `RUST_LOG` filter (falling back to
/// `default_directive`) and the `fmt` layer.
///
/// Returns false if a subscriber was already installed, so repeated calls
/// are harmless.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_a_no_op() {
        init_tracing("debug");
        assert!(!init_tracing("debug"));
    }
}
