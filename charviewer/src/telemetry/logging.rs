//! Logging configuration and initialization
//!
//! Console output is compact text or JSON; an optional log file is written
//! through a non-blocking `tracing-appender` worker.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "CHARVIEWER_LOG";

/// Set to "json" for JSON console output
pub const LOG_FORMAT_ENV: &str = "CHARVIEWER_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Enable console output (default: true)
    pub console_enabled: bool,
    /// Write logs to `file_path` as well (default: false)
    pub file_enabled: bool,
    /// Log file path (default: `charviewer.log` in the working directory)
    pub file_path: Option<PathBuf>,
    /// JSON console output (default: false, overridden by `CHARVIEWER_LOG_FORMAT`)
    pub json_format: bool,
    /// Filter used when neither env variable is set
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_enabled: false,
            file_path: None,
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

impl LogConfig {
    fn log_path(&self) -> PathBuf {
        self.file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("charviewer.log"))
    }
}

/// Logging setup failures
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    File(#[from] std::io::Error),
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Resolve the filter: `CHARVIEWER_LOG`, then `RUST_LOG`, then the config default
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level))
}

fn wants_json(config: &LogConfig) -> bool {
    std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(config.json_format)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of the program.
///
/// ```no_run
/// use charviewer::telemetry::{init_logging, LogConfig};
///
/// let _guard = init_logging(&LogConfig::default()).expect("logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let use_json = wants_json(config);
    let subscriber = tracing_subscriber::registry().with(env_filter(config));

    let mut file_guard = None;
    let file_layer = if config.file_enabled {
        let file = std::fs::File::create(config.log_path())?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        file_guard = Some(guard);
        Some(
            fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false),
        )
    } else {
        None
    };

    let (json_layer, text_layer) = match (config.console_enabled, use_json) {
        (false, _) => (None, None),
        (true, true) => (
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            ),
            None,
        ),
        (true, false) => (
            None,
            Some(fmt::layer().with_target(true).with_thread_ids(false).compact()),
        ),
    };

    subscriber
        .with(file_layer)
        .with(json_layer)
        .with(text_layer)
        .try_init()?;

    tracing::info!(
        target: "charviewer",
        version = env!("CARGO_PKG_VERSION"),
        json_format = use_json,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );
    if config.file_enabled {
        tracing::info!(path = %config.log_path().display(), "Logging to file");
    }

    Ok(file_guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert!(config.console_enabled);
        assert!(!config.file_enabled);
        assert!(!config.json_format);
        assert_eq!(config.default_level, "info");
        assert_eq!(config.log_path(), PathBuf::from("charviewer.log"));
    }

    #[test]
    fn test_custom_log_path() {
        let config = LogConfig {
            file_enabled: true,
            file_path: Some(PathBuf::from("/tmp/viewer.log")),
            ..LogConfig::default()
        };
        assert_eq!(config.log_path(), PathBuf::from("/tmp/viewer.log"));
    }
}
