use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::KeyValueStore;
use crate::error::{GalleryError, Result};

/// Preferences manages small string values in a SQLite database.
/// The gallery keeps its snapshot here under a single key.
pub struct SqlitePreferences {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqlitePreferences {
    /// Open (or create) the preferences database at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GalleryError::Config(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "preferences database opened");

        Self::init(conn, Some(db_path))
    }

    /// Preferences that vanish with the value, for tests and throwaway sessions
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Path of the database file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| GalleryError::PreferencesFailed("connection lock poisoned".into()))
    }
}

#[async_trait]
impl KeyValueStore for SqlitePreferences {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;

        tracing::debug!(key, bytes = value.len(), "preference stored");
        Ok(())
    }
}

impl std::fmt::Debug for SqlitePreferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePreferences")
            .field("db_path", &self.db_path)
            .finish()
    }
}
