//! Logging initialization.
//!
//! Thin wrapper over the observability crate so binaries pick up the
//! `SESSION_LOG_FORMAT` switch without repeating it.

use observability::{LogConfig, LogFormat};

/// Initialize logging for the default "session-store" service.
///
/// # Arguments
///
/// * `level` - Default log level (trace, debug, info, warn, error)
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("started");
/// ```
pub fn init_logging(level: &str) {
    init_logging_for_service("session-store", level);
}

/// Initialize logging with a custom service name.
pub fn init_logging_for_service(service_name: &str, level: &str) {
    let format = std::env::var("SESSION_LOG_FORMAT")
        .map(|value| LogFormat::parse(&value))
        .unwrap_or_default();

    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        format,
    });
}
