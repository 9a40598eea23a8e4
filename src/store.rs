//! Onboarding session state.
//!
//! One `OnboardingStore` per session, owned by the `Wizard` and handed to each
//! step explicitly. Steps only add or overwrite the fields they own; nothing
//! here validates (that is the step's job) and nothing here fails.

use serde::Serialize;

use crate::bridge::Bridge;

/// Every field collected across the wizard. All default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRecord {
    pub first_name: String,
    pub last_name: String,
    pub instagram: String,
    pub linkedin: String,
    pub about: String,
    pub questions_and_answers: String,
    pub referral_source: String,
    pub telegram_username: String,
}

/// Partial update: `Some` fields overwrite, `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub about: Option<String>,
    pub questions_and_answers: Option<String>,
    pub referral_source: Option<String>,
    pub telegram_username: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl OnboardingRecord {
    /// Merges `patch` into the record.
    pub fn apply(&mut self, patch: RecordPatch) {
        let RecordPatch {
            first_name,
            last_name,
            instagram,
            linkedin,
            about,
            questions_and_answers,
            referral_source,
            telegram_username,
        } = patch;

        let merge = |slot: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *slot = value;
            }
        };
        merge(&mut self.first_name, first_name);
        merge(&mut self.last_name, last_name);
        merge(&mut self.instagram, instagram);
        merge(&mut self.linkedin, linkedin);
        merge(&mut self.about, about);
        merge(&mut self.questions_and_answers, questions_and_answers);
        merge(&mut self.referral_source, referral_source);
        merge(&mut self.telegram_username, telegram_username);
    }
}

#[derive(Debug, Default)]
pub struct OnboardingStore {
    record: OnboardingRecord,
}

impl OnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &OnboardingRecord {
        &self.record
    }

    pub fn update(&mut self, patch: RecordPatch) {
        if patch.is_empty() {
            return;
        }
        self.record.apply(patch);
        log::debug!("onboarding record updated: {:?}", self.record);
    }

    /// Best-effort username enrichment from the host: chat username first,
    /// then user username. Leaves the current value untouched when neither exists.
    pub fn resolve_username(&mut self, bridge: &Bridge) -> &str {
        if let Some(username) = bridge.chat_username() {
            log::info!("Telegram chat username set: {}", username);
            self.record.telegram_username = username;
        } else if let Some(username) = bridge.user_username() {
            log::info!("Telegram user username set: {}", username);
            self.record.telegram_username = username;
        } else {
            log::warn!(
                "Failed to set Telegram username (host available: {})",
                bridge.is_available()
            );
        }
        &self.record.telegram_username
    }
}
