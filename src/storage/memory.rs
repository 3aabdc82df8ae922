/// In-memory storage backends
///
/// Used by the tests and by headless sessions that should not touch disk.
/// Each store can be told to fail its next operations of a given kind.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{FileStore, KeyValueStore};
use crate::error::{GalleryError, Result};

/// Operations that can be made to fail on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOn {
    Write,
    Read,
    Delete,
    Set,
    Get,
}

#[derive(Debug, Default)]
struct Failures(HashMap<FailOn, bool>);

impl Failures {
    fn check(&self, op: FailOn) -> std::result::Result<(), String> {
        if self.0.get(&op).copied().unwrap_or(false) {
            Err(format!("injected {:?} failure", op))
        } else {
            Ok(())
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Nothing panics while holding these locks
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    failures: Mutex<Failures>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `op` fail (or succeed again) until changed
    pub fn fail(&self, op: FailOn, enabled: bool) {
        lock(&self.failures).0.insert(op, enabled);
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.files).contains_key(name)
    }

    /// Stored names in sorted order
    pub fn names(&self) -> Vec<String> {
        lock(&self.files).keys().cloned().collect()
    }

    /// Drop a file behind the gallery's back
    pub fn remove_externally(&self, name: &str) {
        lock(&self.files).remove(name);
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        lock(&self.failures)
            .check(FailOn::Write)
            .map_err(|reason| GalleryError::StorageWriteFailed {
                name: name.to_string(),
                reason,
            })?;

        lock(&self.files).insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let fail = |reason: String| GalleryError::StorageReadFailed {
            name: name.to_string(),
            reason,
        };

        lock(&self.failures).check(FailOn::Read).map_err(fail)?;
        lock(&self.files)
            .get(name)
            .cloned()
            .ok_or_else(|| fail("no such file".into()))
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let fail = |reason: String| GalleryError::StorageDeleteFailed {
            name: name.to_string(),
            reason,
        };

        lock(&self.failures).check(FailOn::Delete).map_err(fail)?;
        lock(&self.files)
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| fail("no such file".into()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
    failures: Mutex<Failures>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: FailOn, enabled: bool) {
        lock(&self.failures).0.insert(op, enabled);
    }

    /// Current value without going through the async trait
    pub fn peek(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    /// Seed a value directly, e.g. a snapshot written by an older build
    pub fn put(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryPreferences {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        lock(&self.failures)
            .check(FailOn::Get)
            .map_err(GalleryError::PreferencesFailed)?;
        Ok(lock(&self.values).get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.failures)
            .check(FailOn::Set)
            .map_err(GalleryError::PreferencesFailed)?;
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}
