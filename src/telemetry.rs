//! Tracing initialization for binaries and test harnesses embedding the crate.
//!
//! Library code only emits `tracing` events; nothing is printed until a host
//! process installs a subscriber, either its own or the one below.
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding per-module log directives.
pub const LOG_ENV_VAR: &str = "OUTBREAK_LOG";

/// Directive used when [`LOG_ENV_VAR`] is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "outbreak_projection=info";

static INIT: Once = Once::new();

/// Install a formatted subscriber filtered by `OUTBREAK_LOG`.
///
/// Format: `OUTBREAK_LOG=outbreak_projection::forecast=debug,outbreak_projection=warn`.
///
/// Notes
/// -----
/// - Idempotent. If the host already installed a global subscriber the
///   call leaves it in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Repeated initialization must not panic.
    //
    // Given
    // -----
    // - Two consecutive calls.
    //
    // Expect
    // ------
    // - Both return normally.
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!("telemetry initialized twice");
    }
}
