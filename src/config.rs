//! Environment configuration.

use std::env;
use std::path::PathBuf;

use crate::core::error::SessionError;
use crate::session::countdown::DEFAULT_INTERVIEW_SECONDS;
use crate::session::SessionOptions;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SEC: u64 = 60;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const API_URL_VAR: &str = "MOCKINGBIRD_API_URL";
pub const API_KEY_VAR: &str = "MOCKINGBIRD_API_KEY";
pub const INTERVIEW_SECONDS_VAR: &str = "MOCKINGBIRD_INTERVIEW_SECONDS";
pub const TIMEOUT_SEC_VAR: &str = "MOCKINGBIRD_TIMEOUT_SEC";
pub const LOG_VAR: &str = "MOCKINGBIRD_LOG";
pub const LOG_LEVEL_VAR: &str = "MOCKINGBIRD_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub interview_seconds: u64,
    pub timeout_sec: u64,
    pub log_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            interview_seconds: DEFAULT_INTERVIEW_SECONDS,
            timeout_sec: DEFAULT_TIMEOUT_SEC,
            log_path: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, SessionError> {
        Ok(Self {
            api_url: env_string_opt(API_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: env_string_opt(API_KEY_VAR),
            interview_seconds: env_positive(INTERVIEW_SECONDS_VAR, DEFAULT_INTERVIEW_SECONDS)?,
            timeout_sec: env_positive(TIMEOUT_SEC_VAR, DEFAULT_TIMEOUT_SEC)?,
            log_path: env_string_opt(LOG_VAR).map(PathBuf::from),
            log_level: env_string_opt(LOG_LEVEL_VAR)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            interview_seconds: self.interview_seconds,
            ..SessionOptions::default()
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_positive(key: &str, default: u64) -> Result<u64, SessionError> {
    let Some(raw) = env_string_opt(key) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(SessionError::ConfigurationError(format!(
            "{key} must be greater than zero"
        ))),
        Ok(value) => Ok(value),
        Err(_) => Err(SessionError::ConfigurationError(format!(
            "{key} must be a whole number of seconds, got {raw:?}"
        ))),
    }
}
