use reqwest::StatusCode;

use interview_api::error::parse_error_message;
use interview_api::InterviewApiError;
use mockingbird::SessionError;

#[test]
fn unauthorized_uses_service_message() {
    let body = r#"{"error":"Invalid API key","message":"The provided API key is not valid"}"#;
    assert_eq!(
        parse_error_message(StatusCode::UNAUTHORIZED, body),
        "Unauthorized: The provided API key is not valid"
    );
}

#[test]
fn unauthorized_without_body_has_default_text() {
    assert_eq!(
        parse_error_message(StatusCode::UNAUTHORIZED, ""),
        "Unauthorized: API key missing or invalid"
    );
}

#[test]
fn rate_limit_includes_retry_hint_in_seconds() {
    let body = r#"{"error":"Rate limit exceeded","message":"Too many requests. Please try again later.","retryAfter":41500}"#;
    assert_eq!(
        parse_error_message(StatusCode::TOO_MANY_REQUESTS, body),
        "Too many requests. Please try again later. Retry in 42s."
    );
}

#[test]
fn error_field_is_used_when_message_is_missing() {
    let body = r#"{"error":"AI service not initialized"}"#;
    assert_eq!(
        parse_error_message(StatusCode::INTERNAL_SERVER_ERROR, body),
        "AI service not initialized"
    );
}

#[test]
fn raw_body_and_reason_fallbacks() {
    assert_eq!(
        parse_error_message(StatusCode::BAD_GATEWAY, "upstream down"),
        "upstream down"
    );
    assert_eq!(
        parse_error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
        "Service Unavailable"
    );
}

#[test]
fn kind_separates_configuration_from_network_failures() {
    let unauthorized = InterviewApiError::Status(StatusCode::UNAUTHORIZED, "nope".to_string());
    assert!(matches!(
        unauthorized.kind(),
        SessionError::ConfigurationError(_)
    ));

    let unavailable =
        InterviewApiError::Status(StatusCode::SERVICE_UNAVAILABLE, "busy".to_string());
    let session_error: SessionError = unavailable.into();
    assert_eq!(
        session_error,
        SessionError::NetworkFailure("API request failed: 503 busy".to_string())
    );

    assert!(matches!(
        InterviewApiError::InvalidBaseUrl("ftp://x".to_string()).kind(),
        SessionError::ConfigurationError(_)
    ));
}
