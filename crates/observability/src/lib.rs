//! Tracing and logging setup shared by the Adala binaries.

/// Initialize process-wide tracing with the format chosen by
/// `ADALA_LOG_FORMAT` (`json`, the default, or `text`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;
