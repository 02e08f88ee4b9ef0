//! Transport-only client for the interviewer service.
//!
//! Builds and sends the two JSON requests a session needs: a chat turn
//! (`POST /api/chat`) and feedback generation (`POST /api/feedback`). Nothing here knows about
//! panes, focus or the terminal; callers hand over plain payloads and get typed responses back.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod payload;
pub mod url;

pub use client::InterviewApiClient;
pub use config::InterviewApiConfig;
pub use error::InterviewApiError;
pub use payload::{ChatRequest, ChatResponse, FeedbackRequest, FeedbackResponse};
pub use url::{chat_endpoint, feedback_endpoint};
