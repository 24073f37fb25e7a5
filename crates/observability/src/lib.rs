//! Process-wide logging setup shared by the binaries.

/// Initialize tracing from the environment (`RUST_LOG`, `SIMRS_LOG_FORMAT`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filter, output format).
pub mod tracing;

pub use self::tracing::{LogFormat, TracingConfig};
