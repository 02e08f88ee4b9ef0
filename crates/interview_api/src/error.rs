use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

use mockingbird::SessionError;

#[derive(Debug)]
pub enum InterviewApiError {
    InvalidBaseUrl(String),
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Serde(JsonError),
    EmptyResponse(&'static str),
}

/// Error body shape returned by the service: `{error, message, retryAfter}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: Option<String>,
    pub message: Option<String>,
    /// Milliseconds until the rate-limit window resets.
    #[serde(rename = "retryAfter")]
    pub retry_after: Option<u64>,
}

impl ErrorPayload {
    fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .and_then(non_empty_string)
            .or_else(|| self.error.as_deref().and_then(non_empty_string))
    }
}

impl InterviewApiError {
    /// Engine-level classification: bad setup versus a failed call.
    pub fn kind(&self) -> SessionError {
        let detail = self.to_string();
        match self {
            Self::InvalidBaseUrl(_) | Self::InvalidHeader(_) => {
                SessionError::ConfigurationError(detail)
            }
            Self::Status(status, _) if *status == StatusCode::UNAUTHORIZED => {
                SessionError::ConfigurationError(detail)
            }
            Self::Request(_) | Self::Status(_, _) | Self::Serde(_) | Self::EmptyResponse(_) => {
                SessionError::NetworkFailure(detail)
            }
        }
    }
}

impl fmt::Display for InterviewApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(value) => write!(f, "invalid base URL: {value}"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) if error.is_timeout() => write!(f, "request timed out"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => {
                write!(f, "API request failed: {} {message}", status.as_u16())
            }
            Self::Serde(error) => write!(f, "malformed response: {error}"),
            Self::EmptyResponse(field) => write!(f, "response had an empty '{field}' field"),
        }
    }
}

impl std::error::Error for InterviewApiError {}

impl From<reqwest::Error> for InterviewApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for InterviewApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

impl From<InterviewApiError> for SessionError {
    fn from(error: InterviewApiError) -> Self {
        error.kind()
    }
}

/// Human-readable failure text for a non-2xx response.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<ErrorPayload>(body).unwrap_or_default();
    let text = parsed.text().map(str::to_owned);

    match status {
        StatusCode::UNAUTHORIZED => {
            let detail = text.unwrap_or_else(|| "API key missing or invalid".to_owned());
            format!("Unauthorized: {detail}")
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let detail = text.unwrap_or_else(|| "Too many requests.".to_owned());
            match parsed.retry_after {
                Some(ms) => format!("{detail} Retry in {}s.", ms.div_ceil(1000)),
                None => detail,
            }
        }
        _ => text.unwrap_or_else(|| fallback_text(status, body)),
    }
}

fn fallback_text(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.starts_with('{') {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
