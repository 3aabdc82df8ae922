/// Photo gallery core
///
/// Capture a photo, keep it on disk, list it newest first, delete it.
/// The UI lives in main.rs; everything it needs is here:
/// - state: the gallery store, its records and the persisted snapshot
/// - storage: where photo bytes and the snapshot are kept
/// - capture: where new photos come from

pub mod capture;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

pub use capture::{CaptureDevice, CaptureOptions, CapturedPhoto};
pub use config::GalleryConfig;
pub use error::{GalleryError, Result};
pub use state::data::{LoadSummary, PhotoRecord};
pub use state::gallery::GalleryStore;
pub use storage::{FileStore, KeyValueStore};
