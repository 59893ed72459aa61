//! Error types for the chordsync library

use std::io;

/// Library error type for chordsync operations.
///
/// Notation and chord errors never surface here; they degrade to soft
/// fallbacks. The only raised conditions are persistence failures and
/// driver-reported playback errors.
#[derive(Debug, thiserror::Error)]
pub enum ChordSyncError {
    /// Configuration / preset persistence error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Error code reported by the media driver, passed through unmodified
    #[error("media driver error code {0}")]
    DriverError(i32),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for ChordSyncError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
