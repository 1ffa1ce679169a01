//! Preset and storage errors

use thiserror::Error;

/// Errors from the preset key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage quota exceeded ({needed} of {quota} bytes)")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("Could not find config directory")]
    NoConfigDir,
}

/// Errors that can occur during preset operations
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid preset format: {}", .found.as_deref().unwrap_or("missing"))]
    InvalidFormat { found: Option<String> },
    #[error("Cannot migrate legacy preset: {0}")]
    Migration(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Preset not found: {0}")]
    NotFound(i64),
}
