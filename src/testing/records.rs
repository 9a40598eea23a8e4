use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{Question, RecordError, RecordId, RecordService, SubmissionFields, UploadedAttachment};
use crate::photo::CapturedPhoto;

/// One call seen by `InMemoryRecords`, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordCall {
    Create(SubmissionFields),
    Upload {
        record_id: RecordId,
        file_name: String,
        size: usize,
    },
    FetchQuestions,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordCall>,
    next_id: usize,
    questions: Vec<Question>,
    fail_create: Option<RecordError>,
    fail_upload: Option<RecordError>,
    fail_questions: Option<RecordError>,
}

/// Record service kept in memory. Ids are `rec1`, `rec2`, ... in creation order.
/// Failures are one-shot: the next matching call fails, later ones succeed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecords {
    state: Arc<Mutex<State>>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions<I, S>(self, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut state = self.lock();
            state.questions = questions
                .into_iter()
                .enumerate()
                .map(|(i, text)| Question::new(format!("q{}", i + 1), text))
                .collect();
        }
        self
    }

    pub fn fail_next_create(&self, error: RecordError) {
        self.lock().fail_create = Some(error);
    }

    pub fn fail_next_upload(&self, error: RecordError) {
        self.lock().fail_upload = Some(error);
    }

    pub fn fail_next_questions(&self, error: RecordError) {
        self.lock().fail_questions = Some(error);
    }

    pub fn calls(&self) -> Vec<RecordCall> {
        self.lock().calls.clone()
    }

    pub fn create_count(&self) -> usize {
        self.count(|c| matches!(c, RecordCall::Create(_)))
    }

    pub fn upload_count(&self) -> usize {
        self.count(|c| matches!(c, RecordCall::Upload { .. }))
    }

    /// Fields of the most recent create call.
    pub fn last_created(&self) -> Option<SubmissionFields> {
        self.lock().calls.iter().rev().find_map(|c| match c {
            RecordCall::Create(fields) => Some(fields.clone()),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&RecordCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RecordService for InMemoryRecords {
    async fn create_record(&self, fields: &SubmissionFields) -> Result<RecordId, RecordError> {
        let mut state = self.lock();
        state.calls.push(RecordCall::Create(fields.clone()));
        if let Some(err) = state.fail_create.take() {
            return Err(err);
        }
        state.next_id += 1;
        let id = RecordId::new(format!("rec{}", state.next_id));
        log::info!("[in-memory] created record {}", id);
        Ok(id)
    }

    async fn upload_attachment(
        &self,
        record_id: &RecordId,
        photo: &CapturedPhoto,
    ) -> Result<UploadedAttachment, RecordError> {
        let mut state = self.lock();
        state.calls.push(RecordCall::Upload {
            record_id: record_id.clone(),
            file_name: photo.file_name.clone(),
            size: photo.bytes.len(),
        });
        if let Some(err) = state.fail_upload.take() {
            return Err(err);
        }
        log::info!("[in-memory] attached {} ({} bytes) to {}", photo.file_name, photo.bytes.len(), record_id);
        Ok(UploadedAttachment {
            record_id: record_id.clone(),
            response: json!({ "id": record_id.as_str(), "attachment": photo.file_name }),
        })
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, RecordError> {
        let mut state = self.lock();
        state.calls.push(RecordCall::FetchQuestions);
        if let Some(err) = state.fail_questions.take() {
            return Err(err);
        }
        Ok(state.questions.clone())
    }
}
