/// Gallery configuration
///
/// Locations follow the platform data directory:
/// - Linux: ~/.local/share/photo-gallery
/// - macOS: ~/Library/Application Support/photo-gallery
/// - Windows: %APPDATA%\photo-gallery

use std::env;
use std::path::PathBuf;

use crate::error::{GalleryError, Result};

/// Key of the preferences slot holding the gallery snapshot
pub const SNAPSHOT_KEY: &str = "photos";

/// Extension appended to every stored photo
pub const PHOTO_EXTENSION: &str = "jpeg";

/// JPEG quality requested from the capture device (0-100)
pub const DEFAULT_QUALITY: u8 = 100;

const DATA_DIR_ENV: &str = "PHOTO_GALLERY_DATA_DIR";
const QUALITY_ENV: &str = "PHOTO_GALLERY_QUALITY";

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    /// Root directory for everything the gallery persists
    pub data_dir: PathBuf,
    pub snapshot_key: String,
    pub extension: String,
    pub quality: u8,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::with_data_dir(Self::default_data_dir())
    }
}

impl GalleryConfig {
    /// Configuration rooted at `data_dir`, everything else at defaults
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            snapshot_key: SNAPSHOT_KEY.to_string(),
            extension: PHOTO_EXTENSION.to_string(),
            quality: DEFAULT_QUALITY,
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// `PHOTO_GALLERY_DATA_DIR` overrides the data directory and
    /// `PHOTO_GALLERY_QUALITY` the capture quality.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::var(DATA_DIR_ENV).ok(), env::var(QUALITY_ENV).ok())
    }

    fn from_vars(data_dir: Option<String>, quality: Option<String>) -> Result<Self> {
        let mut config = match data_dir {
            Some(dir) if !dir.trim().is_empty() => Self::with_data_dir(dir),
            Some(_) => return Err(GalleryError::Config(format!("{DATA_DIR_ENV} is empty"))),
            None => Self::default(),
        };

        if let Some(raw) = quality {
            config.quality = parse_quality(&raw)?;
        }

        Ok(config)
    }

    /// Directory holding the photo files
    pub fn photos_dir(&self) -> PathBuf {
        self.data_dir.join("photos")
    }

    /// SQLite database backing the preferences slot
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.db")
    }

    fn default_data_dir() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("photo-gallery");
        path
    }
}

fn parse_quality(raw: &str) -> Result<u8> {
    let quality: u8 = raw
        .trim()
        .parse()
        .map_err(|_| GalleryError::Config(format!("{QUALITY_ENV} must be 0-100, got '{raw}'")))?;

    if quality > 100 {
        return Err(GalleryError::Config(format!(
            "{QUALITY_ENV} must be 0-100, got {quality}"
        )));
    }

    Ok(quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_data_dir() {
        let config = GalleryConfig::with_data_dir("/tmp/gallery");
        assert_eq!(config.photos_dir(), PathBuf::from("/tmp/gallery/photos"));
        assert_eq!(
            config.preferences_path(),
            PathBuf::from("/tmp/gallery/preferences.db")
        );
        assert_eq!(config.snapshot_key, "photos");
        assert_eq!(config.extension, "jpeg");
        assert_eq!(config.quality, 100);
    }

    #[test]
    fn test_env_overrides() {
        let config =
            GalleryConfig::from_vars(Some("/srv/pics".into()), Some(" 80 ".into())).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/pics"));
        assert_eq!(config.quality, 80);
    }

    #[test]
    fn test_invalid_quality_rejected() {
        assert!(matches!(
            GalleryConfig::from_vars(None, Some("101".into())),
            Err(GalleryError::Config(_))
        ));
        assert!(matches!(
            GalleryConfig::from_vars(None, Some("high".into())),
            Err(GalleryError::Config(_))
        ));
    }

    #[test]
    fn test_empty_data_dir_rejected() {
        assert!(matches!(
            GalleryConfig::from_vars(Some("  ".into()), None),
            Err(GalleryError::Config(_))
        ));
    }
}
