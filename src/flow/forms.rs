//! Per-step input forms.
//!
//! A form is pre-populated from the store, edited by the user, and only
//! committed when `can_submit()` holds. `can_submit()` is what drives the
//! enabled state of the step's primary button.

use thiserror::Error;

use crate::client::Question;
use crate::store::{OnboardingRecord, RecordPatch};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("enter at least one social profile")]
    NoSocials,

    #[error("no questions were loaded")]
    NoQuestions,

    #[error("question {0} needs an answer")]
    Unanswered(usize),

    #[error("expected {expected} answers, got {actual}")]
    AnswerCount { expected: usize, actual: usize },
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameForm {
    pub first_name: String,
    pub last_name: String,
}

impl NameForm {
    pub fn from_record(record: &OnboardingRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !filled(&self.first_name) {
            return Err(ValidationError::Required("first name"));
        }
        if !filled(&self.last_name) {
            return Err(ValidationError::Required("last name"));
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn to_patch(&self) -> RecordPatch {
        RecordPatch {
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialsForm {
    pub instagram: String,
    pub linkedin: String,
}

impl SocialsForm {
    pub fn from_record(record: &OnboardingRecord) -> Self {
        Self {
            instagram: record.instagram.clone(),
            linkedin: record.linkedin.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if filled(&self.instagram) || filled(&self.linkedin) {
            Ok(())
        } else {
            Err(ValidationError::NoSocials)
        }
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Handles are stored without a leading `@`.
    pub fn to_patch(&self) -> RecordPatch {
        let handle = |raw: &str| raw.trim().trim_start_matches('@').to_string();
        RecordPatch {
            instagram: Some(handle(&self.instagram)),
            linkedin: Some(handle(&self.linkedin)),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutForm {
    pub about: String,
}

impl AboutForm {
    pub fn from_record(record: &OnboardingRecord) -> Self {
        Self {
            about: record.about.clone(),
        }
    }

    pub fn can_submit(&self) -> bool {
        true
    }

    pub fn to_patch(&self) -> RecordPatch {
        RecordPatch {
            about: Some(self.about.trim().to_string()),
            ..Default::default()
        }
    }
}

/// Answers to the questions fetched from the record service, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionsForm {
    questions: Vec<Question>,
    pub answers: Vec<String>,
}

impl QuestionsForm {
    pub fn new(questions: Vec<Question>) -> Self {
        let answers = vec![String::new(); questions.len()];
        Self { questions, answers }
    }

    /// Form for `questions` with answers recovered from a transcript written by
    /// [`QuestionsForm::transcript`]. Parsing stops at the first question that does
    /// not match, so a changed question list leaves the remaining answers blank.
    pub fn from_transcript(questions: Vec<Question>, transcript: &str) -> Self {
        let mut form = Self::new(questions);
        let mut rest = transcript;
        for index in 0..form.questions.len() {
            let header = format!("{}\n", form.questions[index].text);
            let Some(body) = rest.strip_prefix(header.as_str()) else {
                break;
            };
            let end = form
                .questions
                .get(index + 1)
                .and_then(|next| body.find(&format!("\n\n{}\n", next.text)))
                .unwrap_or(body.len());
            form.answers[index] = body[..end].to_string();
            rest = body[end..].strip_prefix("\n\n").unwrap_or(&body[end..]);
        }
        form
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answer(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.answers.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::NoQuestions);
        }
        if self.answers.len() != self.questions.len() {
            return Err(ValidationError::AnswerCount {
                expected: self.questions.len(),
                actual: self.answers.len(),
            });
        }
        match self.answers.iter().position(|a| !filled(a)) {
            Some(index) => Err(ValidationError::Unanswered(index + 1)),
            None => Ok(()),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// `question\nanswer` blocks separated by a blank line.
    pub fn transcript(&self) -> String {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(q, a)| format!("{}\n{}", q.text, a.trim()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn to_patch(&self) -> RecordPatch {
        RecordPatch {
            questions_and_answers: Some(self.transcript()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferralForm {
    pub referral_source: String,
}

impl ReferralForm {
    pub fn from_record(record: &OnboardingRecord) -> Self {
        Self {
            referral_source: record.referral_source.clone(),
        }
    }

    pub fn can_submit(&self) -> bool {
        true
    }

    pub fn to_patch(&self) -> RecordPatch {
        RecordPatch {
            referral_source: Some(self.referral_source.trim().to_string()),
            ..Default::default()
        }
    }
}
