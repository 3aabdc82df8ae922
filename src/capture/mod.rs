/// Photo capture
///
/// The gallery asks a `CaptureDevice` for one photo at a time. On desktop
/// the device is a native file picker (picker.rs); tests script their own.

pub mod picker;

use async_trait::async_trait;

use crate::config::DEFAULT_QUALITY;
use crate::error::Result;

/// Where the photo should come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureSource {
    #[default]
    Camera,
    Library,
}

/// How the device should hand the photo back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultType {
    /// Bytes plus a path the renderer can load directly
    #[default]
    Uri,
    /// Bytes only
    Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub source: CaptureSource,
    pub result_type: ResultType,
    /// JPEG quality, 0-100
    pub quality: u8,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            source: CaptureSource::Camera,
            result_type: ResultType::Uri,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// A photo handed back by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    /// JPEG bytes
    pub bytes: Vec<u8>,
    /// Path the renderer can use for this session, if the device has one
    pub web_path: Option<String>,
}

#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Take one photo. Cancellation or denied access is `GalleryError::CaptureAborted`.
    async fn capture(&self, options: &CaptureOptions) -> Result<CapturedPhoto>;
}
