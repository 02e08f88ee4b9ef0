use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::InterviewApiConfig;
use crate::error::{parse_error_message, InterviewApiError};
use crate::headers::build_headers;
use crate::payload::{ChatRequest, ChatResponse, FeedbackRequest, FeedbackResponse};
use crate::url::{chat_endpoint, feedback_endpoint};

#[derive(Debug, Clone)]
pub struct InterviewApiClient {
    http: Client,
    config: InterviewApiConfig,
}

impl InterviewApiClient {
    pub fn new(config: InterviewApiConfig) -> Result<Self, InterviewApiError> {
        validate_base_url(&config.base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(InterviewApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &InterviewApiConfig {
        &self.config
    }

    pub fn build_headers(&self) -> Result<HeaderMap, InterviewApiError> {
        let mut out = HeaderMap::new();
        for (key, value) in build_headers(&self.config) {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| InterviewApiError::InvalidHeader(format!("invalid key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    InterviewApiError::InvalidHeader(format!("invalid value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_chat_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, InterviewApiError> {
        self.build_post(chat_endpoint(&self.config.base_url), request)
    }

    pub fn build_feedback_request(
        &self,
        request: &FeedbackRequest,
    ) -> Result<reqwest::RequestBuilder, InterviewApiError> {
        self.build_post(feedback_endpoint(&self.config.base_url), request)
    }

    /// Sends one chat turn and returns the interviewer's reply text.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<String, InterviewApiError> {
        debug!(messages = request.messages.len(), "sending chat turn");
        let response = self.build_chat_request(request)?.send().await?;
        let body: ChatResponse = read_json(response).await?;
        if body.response.trim().is_empty() {
            return Err(InterviewApiError::EmptyResponse("response"));
        }
        Ok(body.response)
    }

    /// Requests end-of-interview feedback for a flattened transcript.
    pub async fn generate_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<String, InterviewApiError> {
        debug!(
            history_len = request.history_string.len(),
            "requesting feedback"
        );
        let response = self.build_feedback_request(request)?.send().await?;
        let body: FeedbackResponse = read_json(response).await?;
        if body.feedback.trim().is_empty() {
            return Err(InterviewApiError::EmptyResponse("feedback"));
        }
        Ok(body.feedback)
    }

    fn build_post<T: Serialize>(
        &self,
        endpoint: String,
        payload: &T,
    ) -> Result<reqwest::RequestBuilder, InterviewApiError> {
        let headers = self.build_headers()?;
        Ok(self.http.post(endpoint).headers(headers).json(payload))
    }
}

fn validate_base_url(base_url: &str) -> Result<(), InterviewApiError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() || trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(());
    }
    Err(InterviewApiError::InvalidBaseUrl(trimmed.to_string()))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, InterviewApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(InterviewApiError::Status(
            status,
            parse_error_message(status, &body),
        ));
    }
    Ok(serde_json::from_str(&body)?)
}
