//! Process-wide tracing setup shared by binaries and tests.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Initialize process-wide tracing using `LOG_FORMAT` and `RUST_LOG`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    subscriber::init(format);
}
