use serde::{Deserialize, Serialize};

use mockingbird::{ChatMessage, ChatTurn};

/// One transcript entry as the service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContext {
    pub submitted_code: String,
    pub question: String,
    pub interview_time: String,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
    #[serde(default)]
    pub context: WireContext,
}

impl ChatRequest {
    pub fn from_turn(turn: &ChatTurn) -> Self {
        Self {
            messages: turn.messages.iter().map(WireMessage::from).collect(),
            context: WireContext {
                submitted_code: turn.context.submitted_code.clone(),
                question: turn.context.question.clone(),
                interview_time: turn.context.interview_time.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Request body for `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub history_string: String,
}

impl FeedbackRequest {
    pub fn new(history_string: impl Into<String>) -> Self {
        Self {
            history_string: history_string.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
