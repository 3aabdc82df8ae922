/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the storage layer and the UI layer.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Prefix of every display reference built from stored bytes
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Represents a single photo in the gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Generated file name (e.g., "1718035200123.jpeg"), the durable-storage key
    pub storage_name: String,
    /// Renderer-ready form of the photo: an inline data URI or a session path.
    /// Never persisted, recomputed on every load.
    pub display_reference: Option<String>,
}

impl PhotoRecord {
    pub fn new(storage_name: impl Into<String>, display_reference: Option<String>) -> Self {
        Self {
            storage_name: storage_name.into(),
            display_reference,
        }
    }

    /// Decoded image bytes when the display reference is a data URI
    pub fn display_bytes(&self) -> Option<Vec<u8>> {
        let reference = self.display_reference.as_deref()?.strip_prefix("data:")?;
        let (_, payload) = reference.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }

    /// The display reference when it is a plain path rather than a data URI
    pub fn display_path(&self) -> Option<&str> {
        self.display_reference
            .as_deref()
            .filter(|reference| !reference.starts_with("data:"))
    }
}

/// Encode JPEG bytes as an inline data URI
pub fn jpeg_data_uri(bytes: &[u8]) -> String {
    format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(bytes))
}

/// Result of a gallery load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records rebuilt with a fresh display reference
    pub restored: usize,
    /// Records dropped because their backing file could not be read
    pub skipped: usize,
    /// Whether a usable snapshot was present at all
    pub snapshot_found: bool,
}
