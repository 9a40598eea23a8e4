use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the record service client.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Connection, TLS, timeout or body decoding failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status; `body` is kept for diagnostics
    #[error("record service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Success status but a body we could not use
    #[error("unexpected response: {0}")]
    Malformed(String),

    /// Endpoint could not be built from the configured base URL
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl RecordError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RecordError::Status { status, .. } => Some(*status),
            RecordError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Response body, if the service sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            RecordError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}
