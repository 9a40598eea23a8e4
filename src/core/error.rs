use thiserror::Error;

use crate::bridge::InitDataError;
use crate::client::RecordError;
use crate::core::config::ConfigError;
use crate::flow::StepError;

/// Centralized error types for the application
///
/// Everything the `run` and `check-config` commands can fail with before or
/// between wizard steps. Errors a step reports inline stay as `StepError` and
/// only land here when the binary gives up on them.
///
/// # Example
///
/// ```no_run
/// use tg_onboarding::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// IO errors, including a closed stdin
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Init data that failed to parse or verify
    #[error("Init data error: {0}")]
    InitData(#[from] InitDataError),

    /// Record service errors
    #[error("Record service error: {0}")]
    Record(#[from] RecordError),

    /// Wizard step errors
    #[error("Step error: {0}")]
    Step(#[from] StepError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_wraps() {
        let err: AppError = ConfigError::Missing("TEABLE_API_TOKEN").into();
        assert_eq!(
            err.to_string(),
            "Configuration error: missing required environment variable TEABLE_API_TOKEN"
        );
    }

    #[test]
    fn test_step_error_wraps() {
        let err: AppError = StepError::WrongStep {
            expected: crate::flow::Step::Confirmation,
            actual: crate::flow::Step::Photo,
        }
        .into();
        assert!(matches!(err, AppError::Step(StepError::WrongStep { .. })));
    }

    #[test]
    fn test_closed_input_is_io() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "Input closed").into();
        assert_eq!(err.to_string(), "IO error: Input closed");
    }
}
