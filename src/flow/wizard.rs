//! The onboarding session: one store, one navigator, one photo step.
//!
//! Every submit goes through the same gate: right step, form passes its own
//! validation, patch written to the store, light haptic, advance.

use std::sync::Arc;
use thiserror::Error;

use super::{
    AboutForm, NameForm, NavigationError, Navigator, QuestionsForm, ReferralForm, SocialsForm, Step, ValidationError,
};
use crate::bridge::{Bridge, HapticStyle};
use crate::client::{Question, RecordError, RecordService, SubmitterId, UploadedAttachment};
use crate::photo::{Camera, PhotoCapture, PhotoError, VideoConstraints};
use crate::store::{OnboardingRecord, OnboardingStore, RecordPatch};

#[derive(Debug, Error)]
pub enum StepError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("action belongs to {expected}, but the wizard is on {actual}")]
    WrongStep { expected: Step, actual: Step },

    #[error("could not load questions: {0}")]
    QuestionsUnavailable(#[source] RecordError),

    #[error(transparent)]
    Photo(#[from] PhotoError),
}

pub struct Wizard {
    store: OnboardingStore,
    navigator: Navigator,
    bridge: Bridge,
    records: Arc<dyn RecordService>,
    camera: Box<dyn Camera>,
    questions: Vec<Question>,
    photo: PhotoCapture,
}

impl Wizard {
    pub fn new(bridge: Bridge, records: Arc<dyn RecordService>, camera: Box<dyn Camera>) -> Self {
        Self::with_constraints(bridge, records, camera, VideoConstraints::default())
    }

    pub fn with_constraints(
        bridge: Bridge,
        records: Arc<dyn RecordService>,
        camera: Box<dyn Camera>,
        constraints: VideoConstraints,
    ) -> Self {
        Self {
            store: OnboardingStore::new(),
            navigator: Navigator::new(),
            bridge,
            records,
            camera,
            questions: Vec::new(),
            photo: PhotoCapture::new(constraints),
        }
    }

    /// Tells the host we are up, expands the viewport, applies the theme and
    /// pulls the username into the store.
    pub fn start(&mut self) {
        self.bridge.ready();
        self.bridge.expand();
        self.bridge.apply_theme();
        let username = self.store.resolve_username(&self.bridge);
        log::info!("Onboarding started (username: {:?})", username);
    }

    pub fn current(&self) -> Step {
        self.navigator.current()
    }

    pub fn history(&self) -> &[Step] {
        self.navigator.history()
    }

    pub fn record(&self) -> &OnboardingRecord {
        self.store.get()
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn photo(&self) -> &PhotoCapture {
        &self.photo
    }

    pub fn name_form(&self) -> NameForm {
        NameForm::from_record(self.store.get())
    }

    pub fn socials_form(&self) -> SocialsForm {
        SocialsForm::from_record(self.store.get())
    }

    pub fn about_form(&self) -> AboutForm {
        AboutForm::from_record(self.store.get())
    }

    /// Answer sheet for the loaded questions, pre-filled from the stored transcript.
    pub fn questions_form(&self) -> QuestionsForm {
        QuestionsForm::from_transcript(self.questions.clone(), &self.store.get().questions_and_answers)
    }

    pub fn referral_form(&self) -> ReferralForm {
        ReferralForm::from_record(self.store.get())
    }

    /// Welcome → Name.
    pub fn get_started(&mut self) -> Result<Step, StepError> {
        self.expect_step(Step::Welcome)?;
        self.bridge.haptic_pulse(HapticStyle::Medium);
        Ok(self.navigator.advance(Step::Welcome)?)
    }

    pub fn submit_name(&mut self, form: &NameForm) -> Result<Step, StepError> {
        self.commit(Step::Name, form.validate(), form.to_patch())
    }

    pub fn submit_socials(&mut self, form: &SocialsForm) -> Result<Step, StepError> {
        self.commit(Step::Socials, form.validate(), form.to_patch())
    }

    pub fn submit_about(&mut self, form: &AboutForm) -> Result<Step, StepError> {
        self.commit(Step::AboutYou, Ok(()), form.to_patch())
    }

    /// Fetches the question list. On failure the list stays empty and the
    /// questions form cannot submit.
    pub async fn load_questions(&mut self) -> Result<&[Question], StepError> {
        self.expect_step(Step::Questions)?;
        match self.records.fetch_questions().await {
            Ok(questions) => {
                if questions.is_empty() {
                    log::warn!("Question table returned no questions");
                } else {
                    log::info!("Loaded {} questions", questions.len());
                }
                self.questions = questions;
                Ok(&self.questions)
            }
            Err(e) => {
                log::error!("Error fetching questions: {}", e);
                self.questions.clear();
                Err(StepError::QuestionsUnavailable(e))
            }
        }
    }

    pub fn submit_questions(&mut self, form: &QuestionsForm) -> Result<Step, StepError> {
        self.commit(Step::Questions, form.validate(), form.to_patch())
    }

    pub fn submit_referral(&mut self, form: &ReferralForm) -> Result<Step, StepError> {
        self.commit(Step::Referrals, Ok(()), form.to_patch())
    }

    pub async fn open_camera(&mut self) -> Result<(), StepError> {
        self.expect_step(Step::Photo)?;
        Ok(self.photo.open(self.camera.as_ref()).await?)
    }

    /// The preview reported loaded metadata.
    pub fn camera_ready(&mut self) -> Result<(), StepError> {
        self.expect_step(Step::Photo)?;
        Ok(self.photo.metadata_loaded()?)
    }

    pub fn capture(&mut self) -> Result<(), StepError> {
        self.expect_step(Step::Photo)?;
        self.photo.capture()?;
        self.bridge.haptic_pulse(HapticStyle::Medium);
        Ok(())
    }

    pub async fn retake(&mut self) -> Result<(), StepError> {
        self.expect_step(Step::Photo)?;
        Ok(self.photo.retake(self.camera.as_ref()).await?)
    }

    /// Creates the record, uploads the still, then moves to Confirmation.
    /// On failure the wizard stays on Photo with the error shown inline.
    pub async fn submit_photo(&mut self) -> Result<UploadedAttachment, StepError> {
        self.expect_step(Step::Photo)?;
        let submitter = SubmitterId::resolve(self.bridge.user_id(), &self.store.get().telegram_username);
        log::info!("Submitting onboarding for {}", submitter);

        let uploaded = self
            .photo
            .submit(self.store.get(), submitter, self.records.as_ref())
            .await?;

        log::info!("Attachment uploaded to record {}", uploaded.record_id);
        self.photo.teardown();
        self.bridge.haptic_pulse(HapticStyle::Light);
        self.navigator.advance(Step::Photo)?;
        Ok(uploaded)
    }

    /// Previous step, without validation or persistence. Leaving Photo releases the camera.
    /// Confirmation is terminal: back is a no-op there.
    pub fn back(&mut self) -> Step {
        let current = self.current();
        if current.is_terminal() {
            log::debug!("{} is terminal, ignoring back", current);
            return current;
        }
        if current == Step::Photo {
            self.photo.teardown();
        }
        self.navigator.back()
    }

    /// Confirmation's only action.
    pub fn close(&mut self) -> Result<(), StepError> {
        self.expect_step(Step::Confirmation)?;
        log::info!("Onboarding finished, closing app");
        self.bridge.close();
        Ok(())
    }

    fn expect_step(&self, expected: Step) -> Result<(), StepError> {
        let actual = self.current();
        if actual == expected {
            Ok(())
        } else {
            Err(StepError::WrongStep { expected, actual })
        }
    }

    fn commit(
        &mut self,
        step: Step,
        check: Result<(), ValidationError>,
        patch: RecordPatch,
    ) -> Result<Step, StepError> {
        self.expect_step(step)?;
        if let Err(e) = check {
            log::debug!("{} submit rejected: {}", step, e);
            return Err(e.into());
        }
        self.store.update(patch);
        self.bridge.haptic_pulse(HapticStyle::Light);
        Ok(self.navigator.advance(step)?)
    }
}

impl std::fmt::Debug for Wizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("step", &self.current())
            .field("record", self.store.get())
            .field("questions", &self.questions.len())
            .field("photo", &self.photo)
            .finish()
    }
}
