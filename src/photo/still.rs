//! Camera backed by an image file. Used by the terminal runner, where there is
//! no webcam: the file plays the role of the preview and every frame is the file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{Camera, CameraStream, PhotoError, RgbaFrame, VideoConstraints};

#[derive(Debug, Clone)]
pub struct StillImageCamera {
    path: PathBuf,
}

impl StillImageCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RgbaFrame, PhotoError> {
        let reader = image::ImageReader::open(&self.path)
            .map_err(|e| PhotoError::CameraUnavailable(format!("{}: {}", self.path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| PhotoError::CameraUnavailable(format!("{}: {}", self.path.display(), e)))?;
        let decoded = reader
            .decode()
            .map_err(|e| PhotoError::CameraUnavailable(format!("{}: {}", self.path.display(), e)))?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(RgbaFrame::new(width, height, rgba.into_raw()))
    }
}

#[async_trait]
impl Camera for StillImageCamera {
    async fn open(&self, constraints: &VideoConstraints) -> Result<Box<dyn CameraStream>, PhotoError> {
        if constraints.audio {
            log::debug!("Audio requested from a still image source, ignoring");
        }
        let frame = self.load()?;
        log::debug!(
            "Opened still source {} ({}x{})",
            self.path.display(),
            frame.width,
            frame.height
        );
        Ok(Box::new(StillStream { frame, live: true }))
    }
}

struct StillStream {
    frame: RgbaFrame,
    live: bool,
}

impl CameraStream for StillStream {
    fn dimensions(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }

    fn grab_frame(&mut self) -> Result<RgbaFrame, PhotoError> {
        if !self.live {
            return Err(PhotoError::CaptureFailure("stream already stopped".to_string()));
        }
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_opens_png_and_grabs_frames() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("face.png");
        RgbImage::from_pixel(20, 10, Rgb([10, 20, 30])).save(&path).unwrap();

        let camera = StillImageCamera::new(&path);
        let mut stream = camera.open(&VideoConstraints::default()).await.unwrap();
        assert_eq!(stream.dimensions(), (20, 10));
        let frame = stream.grab_frame().unwrap();
        assert_eq!(&frame.pixels[..4], &[10, 20, 30, 255]);

        stream.stop();
        assert!(!stream.is_live());
        assert!(stream.grab_frame().is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_camera_unavailable() {
        let camera = StillImageCamera::new("/nonexistent/face.jpg");
        let err = camera.open(&VideoConstraints::default()).await.err().unwrap();
        assert!(matches!(err, PhotoError::CameraUnavailable(_)));
    }
}
