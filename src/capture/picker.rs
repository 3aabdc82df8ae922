/// Desktop capture device
///
/// Desktops rarely expose a camera the way phones do, so "taking" a photo
/// means picking an image file. Whatever the user picks is normalised to
/// JPEG at the requested quality before it reaches the gallery.

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use rfd::AsyncFileDialog;

use super::{CaptureDevice, CaptureOptions, CaptureSource, CapturedPhoto, ResultType};
use crate::error::{GalleryError, Result};

/// Extensions offered in the picker
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "gif", "tiff"];

#[derive(Debug, Clone, Copy, Default)]
pub struct FilePickerCamera;

impl FilePickerCamera {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CaptureDevice for FilePickerCamera {
    async fn capture(&self, options: &CaptureOptions) -> Result<CapturedPhoto> {
        let title = match options.source {
            CaptureSource::Camera => "Take Photo",
            CaptureSource::Library => "Choose Photo",
        };

        let handle = AsyncFileDialog::new()
            .set_title(title)
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
            .await
            .ok_or_else(|| GalleryError::CaptureAborted("user cancelled photos app".into()))?;

        let raw = handle.read().await;
        let web_path = match options.result_type {
            ResultType::Uri => Some(handle.path().to_string_lossy().to_string()),
            ResultType::Bytes => None,
        };

        // Decoding and re-encoding is CPU-bound
        let quality = options.quality;
        let bytes = tokio::task::spawn_blocking(move || normalize_to_jpeg(&raw, quality))
            .await
            .map_err(|e| GalleryError::CaptureAborted(format!("task join error: {}", e)))?
            .map_err(GalleryError::CaptureAborted)?;

        tracing::info!(bytes = bytes.len(), quality, "photo captured");

        Ok(CapturedPhoto { bytes, web_path })
    }
}

/// Turn any supported image into JPEG bytes.
///
/// JPEG input at full quality is passed through untouched.
pub fn normalize_to_jpeg(data: &[u8], quality: u8) -> std::result::Result<Vec<u8>, String> {
    let quality = quality.clamp(1, 100);
    if quality == 100 && is_jpeg(data) {
        return Ok(data.to_vec());
    }

    let img = image::load_from_memory(data).map_err(|e| format!("unreadable image: {}", e))?;

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, quality))
        .map_err(|e| format!("failed to encode JPEG: {}", e))?;

    Ok(jpeg)
}

/// JPEG Start Of Image marker check
fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8, 0xFF])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba([200, 40, 40, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_png_becomes_jpeg() {
        let jpeg = normalize_to_jpeg(&png_bytes(), 80).unwrap();
        assert!(is_jpeg(&jpeg));

        let decoded = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn test_full_quality_jpeg_passes_through() {
        let jpeg = normalize_to_jpeg(&png_bytes(), 90).unwrap();
        assert_eq!(normalize_to_jpeg(&jpeg, 100).unwrap(), jpeg);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(normalize_to_jpeg(b"definitely not an image", 100).is_err());
    }
}
