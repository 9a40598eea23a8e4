//! Remote record service: where onboarding submissions and their selfies end up.
//!
//! `RecordService` is the seam the photo pipeline talks to. `TeableClient` is
//! the HTTP implementation; `testing::InMemoryRecords` stands in for dry runs
//! and tests. Calls are fire-once: no retries, no idempotency key, so a
//! repeated create after a transport failure can produce a duplicate row.

pub mod error;
pub mod teable;
pub mod types;

pub use error::RecordError;
pub use teable::TeableClient;
pub use types::{Question, RecordId, SubmissionFields, SubmitterId, UploadedAttachment};

use async_trait::async_trait;

use crate::photo::CapturedPhoto;

#[async_trait]
pub trait RecordService: Send + Sync {
    /// Creates one row from `fields` and returns its id.
    async fn create_record(&self, fields: &SubmissionFields) -> Result<RecordId, RecordError>;

    /// Uploads `photo` into the photo attachment field of `record_id`.
    async fn upload_attachment(
        &self,
        record_id: &RecordId,
        photo: &CapturedPhoto,
    ) -> Result<UploadedAttachment, RecordError>;

    /// Lists the onboarding questions, in table order.
    async fn fetch_questions(&self) -> Result<Vec<Question>, RecordError>;
}
