//! tg-onboarding - onboarding wizard for a Telegram Mini App
//!
//! Collects a new member's details across a fixed sequence of steps, takes a
//! verification selfie and submits everything to a hosted table database.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors and logging
//! - `bridge`: the Telegram WebApp host, detected lazily, with an explicit unavailable variant
//! - `store`: the per-session onboarding record
//! - `flow`: steps, navigation, forms and the `Wizard` that ties them together
//! - `photo`: camera acquisition, capture, JPEG encoding and submission
//! - `client`: the record service seam and its Teable REST implementation
//! - `testing`: in-memory camera and record service

pub mod bridge;
pub mod cli;
pub mod client;
pub mod core;
pub mod flow;
pub mod photo;
pub mod store;
pub mod testing;

// Re-export commonly used types for convenience
pub use bridge::Bridge;
pub use client::{RecordService, TeableClient};
pub use core::{config, AppError, AppResult};
pub use flow::{Step, Wizard};
pub use store::{OnboardingRecord, OnboardingStore};
