//! Step sequence, per-step forms and the wizard that drives them.

pub mod forms;
pub mod navigator;
pub mod step;
pub mod wizard;

pub use forms::{AboutForm, NameForm, QuestionsForm, ReferralForm, SocialsForm, ValidationError};
pub use navigator::{NavigationError, Navigator};
pub use step::Step;
pub use wizard::{StepError, Wizard};
