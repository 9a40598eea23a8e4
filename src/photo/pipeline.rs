//! Photo step state machine.
//!
//! ```text
//! Idle → RequestingCamera → Previewing{ready} → Captured → Submitting → Done
//!             ↘                  ↘                 ↘           ↘
//!                               Error  (retake re-enters RequestingCamera)
//! ```
//!
//! Invariants:
//! - a live stream and a captured still never coexist;
//! - capture is refused until the preview reported its metadata;
//! - every exit path (capture, error, teardown, drop) stops the stream;
//! - upload only runs after create returned an id, in this or an earlier attempt.

use super::{encode_jpeg, Camera, CameraStream, CapturedPhoto, PhotoError, VideoConstraints};
use crate::client::{RecordId, RecordService, SubmissionFields, SubmitterId, UploadedAttachment};
use crate::core::config::camera;
use crate::store::OnboardingRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoState {
    Idle,
    RequestingCamera,
    Previewing { ready: bool },
    Captured,
    Submitting,
    Done,
    Error,
}

pub struct PhotoCapture {
    state: PhotoState,
    constraints: VideoConstraints,
    jpeg_quality: u8,
    stream: Option<Box<dyn CameraStream>>,
    still: Option<CapturedPhoto>,
    error: Option<String>,
    /// Record created by an earlier attempt whose upload failed.
    pending_record: Option<RecordId>,
    in_flight: bool,
}

impl Default for PhotoCapture {
    fn default() -> Self {
        Self::new(VideoConstraints::default())
    }
}

impl PhotoCapture {
    pub fn new(constraints: VideoConstraints) -> Self {
        Self {
            state: PhotoState::Idle,
            constraints,
            jpeg_quality: camera::JPEG_QUALITY,
            stream: None,
            still: None,
            error: None,
            pending_record: None,
            in_flight: false,
        }
    }

    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn state(&self) -> PhotoState {
        self.state
    }

    /// Inline error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn still(&self) -> Option<&CapturedPhoto> {
        self.still.as_ref()
    }

    pub fn pending_record(&self) -> Option<&RecordId> {
        self.pending_record.as_ref()
    }

    pub fn has_live_stream(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Capture button enabled.
    pub fn can_capture(&self) -> bool {
        self.state == PhotoState::Previewing { ready: true } && self.stream.is_some()
    }

    /// Continue button enabled.
    pub fn can_submit(&self) -> bool {
        self.still.is_some() && !self.in_flight && matches!(self.state, PhotoState::Captured | PhotoState::Error)
    }

    /// Requests the camera and attaches the stream to the preview.
    /// Refused while a still is held; `retake` is the way to replace it.
    pub async fn open(&mut self, camera: &dyn Camera) -> Result<(), PhotoError> {
        if self.state == PhotoState::Done {
            return Err(PhotoError::AlreadySubmitted);
        }
        if self.still.is_some() {
            log::warn!("Camera requested while a captured photo is held");
            return Err(PhotoError::StillHeld);
        }
        self.release_stream();
        self.state = PhotoState::RequestingCamera;
        log::info!("Initializing camera...");

        match camera.open(&self.constraints).await {
            Ok(stream) => {
                let (width, height) = stream.dimensions();
                log::info!("Camera stream obtained ({}x{})", width, height);
                self.stream = Some(stream);
                self.state = PhotoState::Previewing { ready: false };
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// The preview surface reported loaded metadata; capture becomes possible.
    pub fn metadata_loaded(&mut self) -> Result<(), PhotoError> {
        match (&self.state, &self.stream) {
            (PhotoState::Previewing { .. }, Some(stream)) => {
                let (width, height) = stream.dimensions();
                log::info!("Video metadata loaded ({}x{})", width, height);
                self.state = PhotoState::Previewing { ready: true };
                Ok(())
            }
            _ => Err(PhotoError::NotReady),
        }
    }

    /// Grabs the current frame, encodes it, then stops the camera before keeping the still.
    pub fn capture(&mut self) -> Result<(), PhotoError> {
        if !self.can_capture() {
            log::warn!("Cannot capture: camera not ready (state {:?})", self.state);
            return Err(PhotoError::NotReady);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(PhotoError::NotReady);
        };

        log::info!("Capturing photo...");
        let encoded = stream
            .grab_frame()
            .and_then(|frame| encode_jpeg(&frame, self.jpeg_quality));

        match encoded {
            Ok(photo) => {
                self.release_stream();
                log::info!("Photo captured successfully ({} bytes)", photo.bytes.len());
                self.still = Some(photo);
                self.error = None;
                self.state = PhotoState::Captured;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Discards the still and any error, then asks for the camera again.
    /// A record created by a failed attempt is kept so the new still goes to it.
    pub async fn retake(&mut self, camera: &dyn Camera) -> Result<(), PhotoError> {
        if self.in_flight {
            return Err(PhotoError::Busy);
        }
        if self.state == PhotoState::Done {
            return Err(PhotoError::AlreadySubmitted);
        }
        log::info!("Retaking photo...");
        self.still = None;
        self.error = None;
        self.open(camera).await
    }

    /// Creates the record (unless an earlier attempt already did) and uploads the still.
    pub async fn submit(
        &mut self,
        record: &OnboardingRecord,
        submitter: SubmitterId,
        records: &dyn RecordService,
    ) -> Result<UploadedAttachment, PhotoError> {
        if self.in_flight {
            return Err(PhotoError::Busy);
        }
        if self.state == PhotoState::Done {
            log::warn!("Photo step already submitted, ignoring");
            return Err(PhotoError::AlreadySubmitted);
        }
        let Some(photo) = self.still.clone() else {
            log::error!("No image captured");
            return Err(PhotoError::NoStill);
        };

        self.in_flight = true;
        self.error = None;
        self.state = PhotoState::Submitting;

        let result = self.create_and_upload(record, &submitter, &photo, records).await;
        self.in_flight = false;

        match result {
            Ok(uploaded) => {
                self.pending_record = None;
                self.state = PhotoState::Done;
                Ok(uploaded)
            }
            Err(e) => {
                log::error!("Photo submission failed [{}]: {}", e.subcategory(), e);
                self.error = Some(e.user_message());
                self.state = PhotoState::Error;
                Err(e)
            }
        }
    }

    async fn create_and_upload(
        &mut self,
        record: &OnboardingRecord,
        submitter: &SubmitterId,
        photo: &CapturedPhoto,
        records: &dyn RecordService,
    ) -> Result<UploadedAttachment, PhotoError> {
        let record_id = match self.pending_record.clone() {
            Some(id) => {
                log::info!("Retrying upload for existing record {}", id);
                id
            }
            None => {
                if submitter.is_fallback() {
                    log::warn!("No Telegram identity available, submitting as {}", submitter);
                }
                let fields = SubmissionFields::from_record(record, submitter);
                let id = records.create_record(&fields).await.map_err(PhotoError::Network)?;
                self.pending_record = Some(id.clone());
                id
            }
        };

        records
            .upload_attachment(&record_id, photo)
            .await
            .map_err(|source| PhotoError::Upload { record_id, source })
    }

    /// Stops any live stream. Called on every exit from the step; a preview
    /// in progress falls back to `Idle` so re-entering asks for the camera again.
    pub fn teardown(&mut self) {
        if self.stream.is_some() {
            log::info!("Photo step torn down, releasing camera");
        }
        self.release_stream();
        if matches!(self.state, PhotoState::RequestingCamera | PhotoState::Previewing { .. }) {
            self.state = PhotoState::Idle;
        }
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::info!("Camera track stopped");
        }
    }

    fn fail(&mut self, error: PhotoError) -> PhotoError {
        log::error!("Photo step error [{}]: {}", error.subcategory(), error);
        self.release_stream();
        self.error = Some(error.user_message());
        self.state = PhotoState::Error;
        error
    }
}

impl Drop for PhotoCapture {
    fn drop(&mut self) {
        self.release_stream();
    }
}

impl std::fmt::Debug for PhotoCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoCapture")
            .field("state", &self.state)
            .field("live_stream", &self.has_live_stream())
            .field("still", &self.still)
            .field("error", &self.error)
            .field("pending_record", &self.pending_record)
            .finish()
    }
}
