//! Chat messages and the flattened transcript sent for feedback.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name used in chat requests.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::Assistant => f.write_str("Assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

pub const GREETING: &str = "Hello! I am MockingBird, your AI interviewer. If you need any additional information about the coding question, please let me know. Otherwise you may begin coding and talk me through your thought process.";

/// Text of the synthetic assistant reply appended when a chat call fails.
pub fn chat_failure_message(detail: &str) -> String {
    format!(
        "Sorry, I'm having trouble connecting right now. Please try again later. (Error: {detail})"
    )
}

/// One `"<Role>: <content>"` line per message, joined by newlines.
pub fn history_string(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| format!("{}: {}", message.role, message.content))
        .collect::<Vec<_>>()
        .join("\n")
}
