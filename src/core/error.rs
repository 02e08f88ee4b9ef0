//! Error taxonomy for the session engine.
//!
//! None of these are fatal: edits that fail are dropped, and network or configuration
//! failures are surfaced in-band as chat or feedback text.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A buffer edit was rejected; the buffer is unchanged.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A chat or feedback call did not complete successfully.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The collaborating service is unreachable or misconfigured.
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl SessionError {
    pub fn invalid_control_char(ch: char) -> Self {
        Self::InvalidInput(format!("control character U+{:04X}", ch as u32))
    }

    /// Detail text without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidInput(detail)
            | Self::NetworkFailure(detail)
            | Self::ConfigurationError(detail) => detail,
        }
    }
}
