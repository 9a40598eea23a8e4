use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::submission;
use crate::store::OnboardingRecord;

/// Identifier of a row created in the record service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One onboarding question from the questions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Who the submission belongs to, in order of preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitterId {
    /// Telegram user id from the host's init data
    UserId(i64),
    /// Resolved Telegram username
    Username(String),
    /// Random token when the host gave us nothing (`temp_` + 9 base36 chars)
    Fallback(String),
}

impl SubmitterId {
    pub fn resolve(user_id: Option<i64>, username: &str) -> Self {
        match user_id {
            Some(id) => SubmitterId::UserId(id),
            None if !username.trim().is_empty() => SubmitterId::Username(username.trim().to_string()),
            None => Self::fallback(),
        }
    }

    pub fn fallback() -> Self {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let mut rng = rand::thread_rng();
        let token: String = (0..submission::FALLBACK_ID_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        SubmitterId::Fallback(format!("{}{}", submission::FALLBACK_ID_PREFIX, token))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SubmitterId::Fallback(_))
    }
}

impl fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitterId::UserId(id) => write!(f, "{}", id),
            SubmitterId::Username(name) | SubmitterId::Fallback(name) => f.write_str(name),
        }
    }
}

/// Field map sent on record creation. Keys are the table's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionFields {
    #[serde(rename = "First name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Instagram")]
    pub instagram: String,
    #[serde(rename = "Referral Source")]
    pub referral_source: String,
    #[serde(rename = "Questions answered")]
    pub questions_answered: String,
    pub status: String,
    #[serde(rename = "telegramID")]
    pub telegram_id: String,
}

impl SubmissionFields {
    /// Snapshot of the record plus submitter, with status `pending`.
    ///
    /// The about-you text travels in "Questions answered" as a leading
    /// `About you` block; the table has no column of its own for it.
    pub fn from_record(record: &OnboardingRecord, submitter: &SubmitterId) -> Self {
        let mut sections = Vec::new();
        if !record.about.trim().is_empty() {
            sections.push(format!("About you\n{}", record.about.trim()));
        }
        if !record.questions_and_answers.is_empty() {
            sections.push(record.questions_and_answers.clone());
        }

        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            instagram: record.instagram.clone(),
            referral_source: record.referral_source.clone(),
            questions_answered: sections.join("\n\n"),
            status: submission::PENDING_STATUS.to_string(),
            telegram_id: submitter.to_string(),
        }
    }
}

/// Result of a successful attachment upload; `response` is the service's JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedAttachment {
    pub record_id: RecordId,
    pub response: serde_json::Value,
}
