// ==========================================
// Logging initialization
// ==========================================
// tracing + tracing-subscriber, level picked up from the
// environment.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the log subscriber.
///
/// # Environment
/// - RUST_LOG: level filter (default: info)
///   e.g. RUST_LOG=debug or RUST_LOG=academic_import=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Test-friendly initialization: debug level, test writer, tolerant
/// of repeated calls across test binaries.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
