//! File logging. The terminal belongs to the UI, so log lines only ever go to a file.

use std::fs::{File, OpenOptions};
use std::path::Path;

use mockingbird::config::DEFAULT_LOG_LEVEL;
use mockingbird::{EnvConfig, SessionError};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber when `MOCKINGBIRD_LOG` is set. Returns whether one was installed.
pub fn init_logging(config: &EnvConfig) -> Result<bool, SessionError> {
    let Some(log_path) = config.log_path.as_deref() else {
        return Ok(false);
    };

    let log_file = open_log_file(log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.log_level))
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init()
        .map_err(|error| {
            SessionError::ConfigurationError(format!("failed to install logger: {error}"))
        })?;

    tracing::info!(path = %log_path.display(), "logging initialized");
    Ok(true)
}

/// Unparseable directives fall back to the default level rather than silencing everything.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

pub fn open_log_file(log_path: &Path) -> Result<File, SessionError> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|error| {
                SessionError::ConfigurationError(format!(
                    "failed to create log directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| {
            SessionError::ConfigurationError(format!(
                "failed to open log file '{}': {error}",
                log_path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn no_log_path_installs_nothing() {
        let config = EnvConfig::default();
        assert_eq!(init_logging(&config), Ok(false));
    }

    #[test]
    fn open_log_file_creates_parents_and_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("mockingbird.log");

        let mut first = open_log_file(&path).expect("first open");
        first.write_all(b"one\n").expect("write");
        drop(first);
        let mut second = open_log_file(&path).expect("second open");
        second.write_all(b"two\n").expect("write");
        drop(second);

        assert_eq!(std::fs::read_to_string(&path).expect("read"), "one\ntwo\n");
    }

    #[test]
    fn open_log_file_reports_directory_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error = open_log_file(dir.path()).expect_err("directory is not a file");
        assert!(matches!(error, SessionError::ConfigurationError(ref message)
            if message.starts_with("failed to open log file")));
    }

    #[test]
    fn bad_filter_falls_back_to_default_level() {
        assert_eq!(env_filter("debug").to_string(), "debug");
        assert_eq!(env_filter("mockingbird=loud").to_string(), DEFAULT_LOG_LEVEL);
    }
}
