//! Telemetry and logging infrastructure
//!
//! Structured logging with tracing. The library only emits events; the
//! binary installs the subscriber.

pub mod logging;

pub use logging::{init_logging, LogConfig, LoggingError, LOG_ENV, LOG_FORMAT_ENV};

// Re-export WorkerGuard so callers can store it
pub use tracing_appender::non_blocking::WorkerGuard as LogGuard;
