//! Selfie verification: camera acquisition, capture, JPEG encoding and the
//! create-then-upload submission.

pub mod camera;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod still;

pub use camera::{Camera, CameraStream, FacingMode, RgbaFrame, VideoConstraints};
pub use encode::{encode_jpeg, CapturedPhoto};
pub use error::PhotoError;
pub use pipeline::{PhotoCapture, PhotoState};
pub use still::StillImageCamera;
