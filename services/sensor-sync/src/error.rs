//! Error types for the sensor sync layer

/// Errors that can occur while synchronizing dashboard data
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
