//! Process-wide logging setup for applications built on tgkit.
//!
//! The library crates only emit `tracing` events; installing a subscriber is the
//! application's call. [`init`] wires the usual one.

/// Initialize process-wide tracing.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogFormat, UnknownLogFormat};
