/// Default service root for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub const CHAT_PATH: &str = "/api/chat";
pub const FEEDBACK_PATH: &str = "/api/feedback";

/// Joins a service root with an endpoint path.
///
/// Rules:
/// 1) blank input falls back to [`DEFAULT_BASE_URL`]
/// 2) trailing slashes are dropped
/// 3) a root that already ends with the path is kept unchanged
fn join_endpoint(input: &str, path: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        input.trim()
    };

    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with(path) {
        return trimmed.to_string();
    }
    format!("{trimmed}{path}")
}

pub fn chat_endpoint(base_url: &str) -> String {
    join_endpoint(base_url, CHAT_PATH)
}

pub fn feedback_endpoint(base_url: &str) -> String {
    join_endpoint(base_url, FEEDBACK_PATH)
}
