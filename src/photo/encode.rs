use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, RgbaImage};

use super::{PhotoError, RgbaFrame};
use crate::core::config::camera;

/// An encoded still, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
    pub mime_type: String,
}

impl std::fmt::Debug for CapturedPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedPhoto")
            .field("bytes", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// Encodes an RGBA frame as a JPEG still (alpha is dropped).
pub fn encode_jpeg(frame: &RgbaFrame, quality: u8) -> Result<CapturedPhoto, PhotoError> {
    frame.check()?;

    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| PhotoError::CaptureFailure("frame buffer does not match its size".to_string()))?;
    let rgb = DynamicImage::ImageRgba8(rgba).into_rgb8();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
        .encode(rgb.as_raw(), frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| PhotoError::CaptureFailure(format!("JPEG encode failed: {}", e)))?;

    Ok(CapturedPhoto {
        bytes: Bytes::from(buf),
        width: frame.width,
        height: frame.height,
        file_name: camera::FILE_NAME.to_string(),
        mime_type: camera::MIME_TYPE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_jpeg() {
        let frame = RgbaFrame::filled(32, 24, [200, 120, 40, 255]);
        let photo = encode_jpeg(&frame, camera::JPEG_QUALITY).unwrap();
        assert_eq!(&photo.bytes[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!((photo.width, photo.height), (32, 24));
        assert_eq!(photo.file_name, "verification.jpg");
        assert_eq!(photo.mime_type, "image/jpeg");

        let decoded = image::load_from_memory(&photo.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let frame = RgbaFrame::new(8, 8, vec![0; 12]);
        assert!(matches!(encode_jpeg(&frame, 80), Err(PhotoError::CaptureFailure(_))));
    }
}
