//! # Telemetry
//!
//! Installs the global `tracing` subscriber for hosts that do not have one.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages
//! - `RUST_LOG=giveit_core=trace` - Trace the data model only
//! - Default: `info,giveit=debug`

use tracing_subscriber::EnvFilter;

use crate::error::{SdkError, SdkResult};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info,giveit=debug";

/// Initializes a `fmt` subscriber with the default filter.
pub fn init_tracing() -> SdkResult<()> {
    init_tracing_with(DEFAULT_FILTER)
}

/// Initializes a `fmt` subscriber, preferring `RUST_LOG` over `default_filter`.
///
/// ## Errors
/// [`SdkError::TracingInit`] if a global subscriber is already installed,
/// which is normal when the host application configures its own.
pub fn init_tracing_with(default_filter: &str) -> SdkResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| SdkError::TracingInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        // The first call may succeed or fail depending on test ordering;
        // the second must always report an already-installed subscriber.
        let _ = init_tracing();
        assert!(matches!(init_tracing(), Err(SdkError::TracingInit(_))));
    }
}
