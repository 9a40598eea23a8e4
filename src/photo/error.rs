use thiserror::Error;

use crate::client::{RecordError, RecordId};

/// Errors of the photo step, from camera acquisition to upload.
///
/// Every variant is recovered locally: the step shows `user_message()` inline
/// and the user can retake, retry or go back.
#[derive(Debug, Error)]
pub enum PhotoError {
    /// No camera API, no device, or permission denied
    #[error("Failed to access camera: {0}")]
    CameraUnavailable(String),

    /// Frame grab or encode failed; recoverable via retake
    #[error("Failed to capture photo: {0}")]
    CaptureFailure(String),

    /// Capture requested before the preview reported its metadata
    #[error("Camera is not ready yet")]
    NotReady,

    /// Submit requested without a captured still
    #[error("No photo captured")]
    NoStill,

    /// A submission for this step is already in flight
    #[error("Submission already in progress")]
    Busy,

    /// Camera requested while a captured still is held; retake replaces it
    #[error("A photo is already captured")]
    StillHeld,

    /// The record and its photo were already submitted
    #[error("Photo already submitted")]
    AlreadySubmitted,

    /// Record creation failed; nothing was uploaded
    #[error("Failed to create record: {0}")]
    Network(#[source] RecordError),

    /// Record exists but the selfie did not reach it
    #[error("Failed to upload attachment to record {record_id}: {source}")]
    Upload {
        record_id: RecordId,
        #[source]
        source: RecordError,
    },
}

impl PhotoError {
    /// Returns subcategory for metrics and logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            PhotoError::CameraUnavailable(_) => "camera_unavailable",
            PhotoError::CaptureFailure(_) => "capture_failure",
            PhotoError::NotReady => "not_ready",
            PhotoError::NoStill => "no_still",
            PhotoError::Busy => "busy",
            PhotoError::StillHeld => "still_held",
            PhotoError::AlreadySubmitted => "already_submitted",
            PhotoError::Network(_) => "network",
            PhotoError::Upload { .. } => "upload",
        }
    }

    /// Inline message shown under the camera preview.
    pub fn user_message(&self) -> String {
        match self {
            PhotoError::CameraUnavailable(reason) => format!("Failed to access camera: {}", reason),
            PhotoError::CaptureFailure(_) => "Failed to capture photo. Please retake.".to_string(),
            PhotoError::NotReady => "Camera is still starting, please wait.".to_string(),
            PhotoError::NoStill => "Take a photo first.".to_string(),
            PhotoError::Busy => "Uploading...".to_string(),
            PhotoError::StillHeld => "Photo taken. Retake to replace it.".to_string(),
            PhotoError::AlreadySubmitted => "Your photo has already been submitted.".to_string(),
            PhotoError::Network(_) => "Failed to save data. Please try again.".to_string(),
            PhotoError::Upload { source, .. } => match source.status() {
                Some(status) => format!("Failed to upload attachment: {}", status.as_u16()),
                None => "Failed to upload attachment. Please try again.".to_string(),
            },
        }
    }

    /// Whether the error leaves the step in a state the user can act on without retaking.
    pub fn is_retryable_submit(&self) -> bool {
        matches!(self, PhotoError::Network(_) | PhotoError::Upload { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_subcategory() {
        assert_eq!(PhotoError::CameraUnavailable("denied".into()).subcategory(), "camera_unavailable");
        assert_eq!(PhotoError::NoStill.subcategory(), "no_still");
        assert_eq!(
            PhotoError::Network(RecordError::Malformed("x".into())).subcategory(),
            "network"
        );
    }

    #[test]
    fn test_upload_message_carries_status() {
        let err = PhotoError::Upload {
            record_id: RecordId::new("rec1"),
            source: RecordError::Status {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                body: "{\"message\":\"too big\"}".into(),
            },
        };
        assert_eq!(err.user_message(), "Failed to upload attachment: 413");
        assert!(err.is_retryable_submit());
    }

    #[test]
    fn test_camera_message() {
        let err = PhotoError::CameraUnavailable("Permission denied".into());
        assert_eq!(err.user_message(), "Failed to access camera: Permission denied");
        assert!(!err.is_retryable_submit());
    }
}
