use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::FileStore;
use crate::error::{GalleryError, Result};

/// Stores each photo as a file inside one directory
#[derive(Debug, Clone)]
pub struct DirFileStore {
    dir: PathBuf,
}

impl DirFileStore {
    /// Open (and create if needed) the photo directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| GalleryError::Config(format!("cannot create {}: {}", dir.display(), e)))?;

        tracing::debug!(dir = %dir.display(), "photo directory ready");
        Ok(Self { dir })
    }

    /// Resolve a photo name to its path. Only plain file names are allowed.
    fn path_for(&self, name: &str) -> std::result::Result<PathBuf, String> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && Path::new(name).file_name().is_some_and(|f| f == name);

        if plain {
            Ok(self.dir.join(name))
        } else {
            Err("not a plain file name".to_string())
        }
    }
}

#[async_trait]
impl FileStore for DirFileStore {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let fail = |reason: String| GalleryError::StorageWriteFailed {
            name: name.to_string(),
            reason,
        };

        let path = self.path_for(name).map_err(fail)?;
        fs::write(&path, bytes).await.map_err(|e| fail(e.to_string()))?;

        tracing::debug!(name, bytes = bytes.len(), "photo written");
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let fail = |reason: String| GalleryError::StorageReadFailed {
            name: name.to_string(),
            reason,
        };

        let path = self.path_for(name).map_err(fail)?;
        fs::read(&path).await.map_err(|e| fail(e.to_string()))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let fail = |reason: String| GalleryError::StorageDeleteFailed {
            name: name.to_string(),
            reason,
        };

        let path = self.path_for(name).map_err(fail)?;
        fs::remove_file(&path).await.map_err(|e| fail(e.to_string()))?;

        tracing::debug!(name, "photo deleted");
        Ok(())
    }
}
