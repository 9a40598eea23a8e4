use once_cell::sync::Lazy;
use secrecy::SecretString;
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: onboarding.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "onboarding.log".to_string()));

/// Bot token used to verify Mini App init data signatures.
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable.
/// When unset, init data is accepted without signature validation.
pub static BOT_TOKEN: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .ok()
        .filter(|token| !token.is_empty())
});

/// Raw Mini App init data for terminal runs.
/// Read from TG_INIT_DATA environment variable
pub static INIT_DATA: Lazy<Option<String>> = Lazy::new(|| env::var("TG_INIT_DATA").ok());

/// Default record service host
pub const DEFAULT_TEABLE_BASE_URL: &str = "https://teable.grait.io";

/// Camera capture configuration
pub mod camera {
    /// Preferred frame width for the front camera
    pub const IDEAL_WIDTH: u32 = 1280;

    /// Preferred frame height for the front camera
    pub const IDEAL_HEIGHT: u32 = 720;

    /// JPEG quality for the captured still (0-100)
    pub const JPEG_QUALITY: u8 = 80;

    /// File name the still is uploaded under
    pub const FILE_NAME: &str = "verification.jpg";

    /// MIME type of the encoded still
    pub const MIME_TYPE: &str = "image/jpeg";
}

/// Submission configuration
pub mod submission {
    /// Status every new onboarding row starts in
    pub const PENDING_STATUS: &str = "pending";

    /// Prefix of the random identifier used when the host provides no identity
    pub const FALLBACK_ID_PREFIX: &str = "temp_";

    /// Number of random base36 characters after the prefix
    pub const FALLBACK_ID_LEN: usize = 9;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for record service calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Connect timeout (in seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 15;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Connect timeout duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is absent or empty
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// Environment variable is present but unusable
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Connection settings for the hosted record service (Teable REST API).
///
/// The API token is held as a [`SecretString`] so it never lands in `Debug`
/// output or logs.
#[derive(Debug)]
pub struct RecordApiConfig {
    /// Host for record creation and question lookup
    pub base_url: Url,
    /// Host for attachment uploads (may differ from `base_url`)
    pub upload_base_url: Url,
    /// Table receiving onboarding submissions
    pub table_id: String,
    /// Attachment field the selfie is stored in
    pub photo_field_id: String,
    /// Table holding the onboarding questions
    pub questions_table_id: String,
    /// Bearer credential for the submissions table
    pub api_token: SecretString,
    /// Bearer credential for the questions table, if it differs
    pub questions_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RecordApiConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// | Variable | Required | Default |
    /// |---|---|---|
    /// | `TEABLE_BASE_URL` | no | `https://teable.grait.io` |
    /// | `TEABLE_UPLOAD_BASE_URL` | no | base url |
    /// | `TEABLE_TABLE_ID` | yes | |
    /// | `TEABLE_PHOTO_FIELD_ID` | yes | |
    /// | `TEABLE_QUESTIONS_TABLE_ID` | yes | |
    /// | `TEABLE_API_TOKEN` | yes | |
    /// | `TEABLE_QUESTIONS_TOKEN` | no | api token |
    /// | `HTTP_TIMEOUT_SECS` | no | 60 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let base_url = parse_url(
            "TEABLE_BASE_URL",
            &get("TEABLE_BASE_URL").unwrap_or_else(|| DEFAULT_TEABLE_BASE_URL.to_string()),
        )?;
        let upload_base_url = match get("TEABLE_UPLOAD_BASE_URL") {
            Some(raw) => parse_url("TEABLE_UPLOAD_BASE_URL", &raw)?,
            None => base_url.clone(),
        };

        let timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "HTTP_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?;
                Duration::from_secs(secs)
            }
            None => network::timeout(),
        };

        Ok(Self {
            base_url,
            upload_base_url,
            table_id: required("TEABLE_TABLE_ID")?,
            photo_field_id: required("TEABLE_PHOTO_FIELD_ID")?,
            questions_table_id: required("TEABLE_QUESTIONS_TABLE_ID")?,
            api_token: SecretString::from(required("TEABLE_API_TOKEN")?),
            questions_token: get("TEABLE_QUESTIONS_TOKEN").map(SecretString::from),
            timeout,
        })
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            var,
            reason: "must be an absolute http(s) URL".to_string(),
        });
    }
    Ok(url)
}
