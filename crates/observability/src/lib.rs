//! Process-wide tracing/logging setup shared by binaries and test harnesses.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the process.
///
/// Emits JSON log lines, filtered via `RUST_LOG` (default `info`). Safe to
/// call multiple times; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
