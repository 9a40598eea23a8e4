//! Camera capability: acquiring a live stream and reading frames from it.

use async_trait::async_trait;

use super::PhotoError;
use crate::core::config::camera;

/// Which camera to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Front camera (selfie)
    User,
    /// Rear camera
    Environment,
}

/// Constraints passed to the platform when requesting a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub audio: bool,
}

impl Default for VideoConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::User,
            ideal_width: camera::IDEAL_WIDTH,
            ideal_height: camera::IDEAL_HEIGHT,
            audio: false,
        }
    }
}

/// One video frame as tightly packed RGBA8, at the source's native size.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaFrame {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self { width, height, pixels }
    }

    /// Solid-colour frame.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self::new(width, height, rgba.repeat(count))
    }

    /// Checks the buffer matches `width * height * 4` and is not empty.
    pub fn check(&self) -> Result<(), PhotoError> {
        if self.width == 0 || self.height == 0 {
            return Err(PhotoError::CaptureFailure(format!(
                "frame has no pixels ({}x{})",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(PhotoError::CaptureFailure(format!(
                "frame buffer is {} bytes, expected {} for {}x{}",
                self.pixels.len(),
                expected,
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RgbaFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// A live camera stream. Dropping the handle without `stop()` is a leak of the
/// device; the pipeline always stops streams explicitly.
pub trait CameraStream: Send {
    /// Native frame size reported by the stream.
    fn dimensions(&self) -> (u32, u32);

    /// Reads the current frame.
    fn grab_frame(&mut self) -> Result<RgbaFrame, PhotoError>;

    /// Stops every track of the stream. Idempotent.
    fn stop(&mut self);

    /// Whether any track is still running.
    fn is_live(&self) -> bool;
}

#[async_trait]
pub trait Camera: Send + Sync {
    /// Requests a stream. Must fail with `CameraUnavailable` rather than hang
    /// when there is no camera API, no device, or permission is denied.
    async fn open(&self, constraints: &VideoConstraints) -> Result<Box<dyn CameraStream>, PhotoError>;
}
