use interview_api::{chat_endpoint, feedback_endpoint};

#[test]
fn endpoints_append_paths_to_service_root() {
    assert_eq!(
        chat_endpoint("http://localhost:3000"),
        "http://localhost:3000/api/chat"
    );
    assert_eq!(
        feedback_endpoint("https://mock.example/"),
        "https://mock.example/api/feedback"
    );
}

#[test]
fn endpoints_keep_full_paths_unchanged() {
    assert_eq!(
        chat_endpoint("https://mock.example/api/chat"),
        "https://mock.example/api/chat"
    );
}

#[test]
fn blank_root_falls_back_to_default() {
    assert_eq!(chat_endpoint("  "), "http://localhost:3000/api/chat");
}
