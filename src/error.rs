/// Error types for the gallery
///
/// Every capability propagates these to its caller. Nothing in the library
/// retries or recovers on its own, except load, which treats a corrupt
/// snapshot as "no prior data".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// The user cancelled the capture dialog or the device refused access
    #[error("capture aborted: {0}")]
    CaptureAborted(String),

    #[error("failed to write photo '{name}': {reason}")]
    StorageWriteFailed { name: String, reason: String },

    #[error("failed to read photo '{name}': {reason}")]
    StorageReadFailed { name: String, reason: String },

    #[error("failed to delete photo '{name}': {reason}")]
    StorageDeleteFailed { name: String, reason: String },

    /// The persisted snapshot is not valid structured data
    #[error("gallery snapshot is corrupt: {0}")]
    SnapshotCorrupt(String),

    /// The key-value store could not be read or written
    #[error("preferences store failed: {0}")]
    PreferencesFailed(String),

    #[error("no photo at position {position} (gallery holds {len})")]
    InvalidPosition { position: usize, len: usize },

    #[error("no photo named '{0}'")]
    PhotoNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for GalleryError {
    fn from(err: rusqlite::Error) -> Self {
        GalleryError::PreferencesFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
