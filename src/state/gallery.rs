use tokio::sync::{Mutex, MutexGuard};

use super::data::{jpeg_data_uri, LoadSummary, PhotoRecord};
use super::naming::NameGenerator;
use super::snapshot;
use crate::capture::{CaptureDevice, CaptureOptions};
use crate::config::GalleryConfig;
use crate::error::{GalleryError, Result};
use crate::storage::{FileStore, KeyValueStore};

/// The GalleryStore owns the ordered list of photos (newest first) and keeps
/// it mirrored to durable storage.
///
/// Every capability holds the state lock from start to finish, so an add and
/// a delete triggered together run one after the other instead of
/// interleaving their writes.
pub struct GalleryStore<C, F, K> {
    camera: C,
    files: F,
    preferences: K,
    snapshot_key: String,
    capture_options: CaptureOptions,
    state: Mutex<GalleryState>,
}

struct GalleryState {
    photos: Vec<PhotoRecord>,
    names: NameGenerator,
}

impl<C, F, K> GalleryStore<C, F, K>
where
    C: CaptureDevice,
    F: FileStore,
    K: KeyValueStore,
{
    /// Create an empty store. Call `load` to restore a previous session.
    pub fn new(config: &GalleryConfig, camera: C, files: F, preferences: K) -> Self {
        Self {
            camera,
            files,
            preferences,
            snapshot_key: config.snapshot_key.clone(),
            capture_options: CaptureOptions {
                quality: config.quality,
                ..CaptureOptions::default()
            },
            state: Mutex::new(GalleryState {
                photos: Vec::new(),
                names: NameGenerator::new(config.extension.clone()),
            }),
        }
    }

    /// Take a photo, store it, and put it at the front of the gallery.
    ///
    /// The file is written before the record exists, and the snapshot is
    /// written before the record becomes visible, so any failure leaves the
    /// gallery exactly as it was.
    pub async fn add_new_to_gallery(&self) -> Result<PhotoRecord> {
        let mut state = self.state.lock().await;

        let captured = self.camera.capture(&self.capture_options).await?;

        let GalleryState { photos, names } = &mut *state;
        let storage_name = names.next_name(|name| photos.iter().any(|p| p.storage_name == name));

        self.files.write(&storage_name, &captured.bytes).await?;

        let display_reference = captured
            .web_path
            .unwrap_or_else(|| jpeg_data_uri(&captured.bytes));
        let record = PhotoRecord::new(storage_name, Some(display_reference));

        let mut updated = Vec::with_capacity(photos.len() + 1);
        updated.push(record.clone());
        updated.extend(photos.iter().cloned());

        if let Err(err) = self.persist(&updated).await {
            if let Err(cleanup) = self.files.delete(&record.storage_name).await {
                tracing::warn!(name = %record.storage_name, error = %cleanup, "orphaned photo file");
            }
            return Err(err);
        }

        *photos = updated;
        tracing::info!(name = %record.storage_name, count = photos.len(), "photo added");

        Ok(record)
    }

    /// Rebuild the gallery from the persisted snapshot.
    ///
    /// Records whose file can no longer be read are skipped. A missing or
    /// corrupt snapshot gives an empty gallery. Nothing is written.
    pub async fn load(&self) -> Result<LoadSummary> {
        let mut state = self.state.lock().await;
        let mut summary = LoadSummary::default();

        let names = match self.preferences.get(&self.snapshot_key).await? {
            None => Vec::new(),
            Some(json) => match snapshot::decode(&json) {
                Ok(names) => {
                    summary.snapshot_found = true;
                    names
                }
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring unreadable gallery snapshot");
                    Vec::new()
                }
            },
        };

        let mut photos = Vec::with_capacity(names.len());
        for name in names {
            match self.files.read(&name).await {
                Ok(bytes) => {
                    photos.push(PhotoRecord::new(name, Some(jpeg_data_uri(&bytes))));
                    summary.restored += 1;
                }
                Err(err) => {
                    tracing::warn!(name = %name, error = %err, "skipping photo without readable file");
                    summary.skipped += 1;
                }
            }
        }

        state.photos = photos;
        tracing::info!(
            restored = summary.restored,
            skipped = summary.skipped,
            "gallery loaded"
        );

        Ok(summary)
    }

    /// Delete the photo at `position`.
    ///
    /// The record leaves the gallery as soon as the position is valid. A
    /// failure afterwards (snapshot or file) is returned but not rolled back,
    /// which can leave an orphaned file behind.
    pub async fn delete_picture(&self, position: usize) -> Result<PhotoRecord> {
        let state = self.state.lock().await;
        self.delete_locked(state, position).await
    }

    /// Delete the photo stored under `storage_name`
    pub async fn delete_named(&self, storage_name: &str) -> Result<PhotoRecord> {
        let state = self.state.lock().await;
        let position = state
            .photos
            .iter()
            .position(|p| p.storage_name == storage_name)
            .ok_or_else(|| GalleryError::PhotoNotFound(storage_name.to_string()))?;

        self.delete_locked(state, position).await
    }

    async fn delete_locked(
        &self,
        mut state: MutexGuard<'_, GalleryState>,
        position: usize,
    ) -> Result<PhotoRecord> {
        let len = state.photos.len();
        if position >= len {
            return Err(GalleryError::InvalidPosition { position, len });
        }

        let removed = state.photos.remove(position);
        self.persist(&state.photos).await?;

        if let Err(err) = self.files.delete(&removed.storage_name).await {
            tracing::warn!(name = %removed.storage_name, error = %err, "photo removed but file left behind");
            return Err(err);
        }

        tracing::info!(name = %removed.storage_name, position, "photo deleted");
        Ok(removed)
    }

    /// The gallery, newest first
    pub async fn photos(&self) -> Vec<PhotoRecord> {
        self.state.lock().await.photos.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.photos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    pub(crate) fn files(&self) -> &F {
        &self.files
    }

    #[cfg(test)]
    pub(crate) fn preferences(&self) -> &K {
        &self.preferences
    }

    async fn persist(&self, photos: &[PhotoRecord]) -> Result<()> {
        let json = snapshot::encode(photos)?;
        self.preferences.set(&self.snapshot_key, &json).await
    }
}
