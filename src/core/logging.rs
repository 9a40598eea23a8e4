//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Record service configuration logging at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config::{self, RecordApiConfig};

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the record service configuration at application startup
///
/// Tokens are never printed, only whether they are present.
pub fn log_record_api_configuration(api: &RecordApiConfig) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Record service configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("  base url:        {}", api.base_url);
    if api.upload_base_url != api.base_url {
        log::info!("  upload base url: {}", api.upload_base_url);
    }
    log::info!("  submissions:     {} (photo field {})", api.table_id, api.photo_field_id);
    log::info!("  questions:       {}", api.questions_table_id);
    log::info!(
        "  questions token: {}",
        if api.questions_token.is_some() {
            "dedicated"
        } else {
            "shared with submissions"
        }
    );
    log::info!("  timeout:         {:?}", api.timeout);

    if config::BOT_TOKEN.is_some() {
        log::info!("✅ BOT_TOKEN set - Mini App init data will be signature-checked");
    } else {
        log::warn!("⚠️  BOT_TOKEN not set - init data is trusted without validation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_init_logger_creates_log_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("onboarding.log");
        assert!(!path.exists());

        // The global logger can only be installed once per process; the file is created first.
        let _ = init_logger(path.to_str().unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_init_logger_rejects_bad_path() {
        let result = init_logger("/nonexistent-dir/for/sure/onboarding.log");
        assert!(result.is_err());
    }
}
