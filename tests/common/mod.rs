//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::sync::Arc;

use secrecy::SecretString;
use tg_onboarding::bridge::{Bridge, CallLog, HeadlessHost, InitData};
use tg_onboarding::config::RecordApiConfig;
use tg_onboarding::flow::Wizard;
use tg_onboarding::testing::{CameraBehavior, FakeCamera, InMemoryRecords};
use url::Url;

pub const TABLE_ID: &str = "tblSubmissions";
pub const PHOTO_FIELD_ID: &str = "fldPhoto";
pub const QUESTIONS_TABLE_ID: &str = "tblQuestions";
pub const API_TOKEN: &str = "test-api-token";

/// Init data for user 42 (`ada_l`) opened from the `@club_onboarding` chat.
pub const INIT_DATA: &str = "user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ada%22%2C%22username%22%3A%22ada_l%22%7D&chat=%7B%22id%22%3A-100%2C%22type%22%3A%22supergroup%22%2C%22username%22%3A%22club_onboarding%22%7D&auth_date=1700000000&hash=unused";

/// Record API configuration pointing every endpoint at `server_uri`.
pub fn record_config(server_uri: &str) -> RecordApiConfig {
    let base = Url::parse(server_uri).expect("mock server uri");
    RecordApiConfig {
        base_url: base.clone(),
        upload_base_url: base,
        table_id: TABLE_ID.to_string(),
        photo_field_id: PHOTO_FIELD_ID.to_string(),
        questions_table_id: QUESTIONS_TABLE_ID.to_string(),
        api_token: SecretString::from(API_TOKEN),
        questions_token: None,
        timeout: std::time::Duration::from_secs(5),
    }
}

/// Everything a wizard test needs to drive and observe a session.
pub struct Harness {
    pub wizard: Wizard,
    pub records: InMemoryRecords,
    pub camera: FakeCamera,
    pub host_calls: CallLog,
}

impl Harness {
    pub fn new(init_data: &str) -> Self {
        Self::with(
            init_data,
            InMemoryRecords::new().with_questions(["Why join?", "What do you build?"]),
        )
    }

    pub fn with(init_data: &str, records: InMemoryRecords) -> Self {
        let host = HeadlessHost::new(InitData::parse(init_data).expect("init data"));
        let host_calls = host.call_log();
        let camera = FakeCamera::new(CameraBehavior::Available { width: 64, height: 48 });
        let wizard = Wizard::new(
            Bridge::with_host(host),
            Arc::new(records.clone()),
            Box::new(camera.clone()),
        );
        Self {
            wizard,
            records,
            camera,
            host_calls,
        }
    }

    /// Session outside Telegram: the bridge is unavailable.
    pub fn without_host(records: InMemoryRecords) -> Self {
        let camera = FakeCamera::new(CameraBehavior::Available { width: 64, height: 48 });
        let wizard = Wizard::new(
            Bridge::unavailable(),
            Arc::new(records.clone()),
            Box::new(camera.clone()),
        );
        Self {
            wizard,
            records,
            camera,
            host_calls: CallLog::default(),
        }
    }
}
