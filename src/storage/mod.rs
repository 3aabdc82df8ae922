/// Persistence collaborators
///
/// The gallery only talks to storage through these two narrow traits:
/// - `FileStore`: named byte blobs (one per photo)
/// - `KeyValueStore`: small string slots (the gallery snapshot)
///
/// Backends:
/// - files.rs: photos as files in a directory
/// - preferences.rs: key-value slots in a SQLite database
/// - memory.rs: in-memory versions of both, with failure injection

pub mod files;
pub mod memory;
pub mod preferences;

use async_trait::async_trait;

use crate::error::Result;

/// Durable storage for photo bytes, addressed by name
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist `bytes` under `name`, replacing any previous content
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<()>;

    /// Read the bytes stored under `name`; fails if absent or unreadable
    async fn read(&self, name: &str) -> Result<Vec<u8>>;

    /// Remove `name`; fails if absent or unremovable
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Small persistent string slots
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `None` means nothing was ever stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
