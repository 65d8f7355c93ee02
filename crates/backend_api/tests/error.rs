use reqwest::StatusCode;

use backend_api::error::{structured_error_message, unstructured_error_message};
use backend_api::{BackendApiError, ErrorKind, Failure, Operation, RequestOutcome};

#[test]
fn structured_detail_string_is_surfaced_verbatim() {
    let body = r#"{"detail":"quota exceeded"}"#;
    assert_eq!(structured_error_message(body).as_deref(), Some("quota exceeded"));
}

#[test]
fn structured_detail_list_joins_messages() {
    let body = r#"{"detail":[{"loc":["body","question"],"msg":"field required","type":"value_error.missing"},{"msg":"too short"}]}"#;
    assert_eq!(
        structured_error_message(body).as_deref(),
        Some("field required; too short")
    );
}

#[test]
fn structured_error_envelope_is_recognized() {
    assert_eq!(
        structured_error_message(r#"{"error":{"message":"invalid model"}}"#).as_deref(),
        Some("invalid model")
    );
    assert_eq!(
        structured_error_message(r#"{"error":"backend offline"}"#).as_deref(),
        Some("backend offline")
    );
}

#[test]
fn unrecognized_bodies_are_not_structured() {
    assert_eq!(structured_error_message(""), None);
    assert_eq!(structured_error_message("upstream exploded"), None);
    assert_eq!(structured_error_message(r#"{"status":"bad"}"#), None);
    assert_eq!(structured_error_message(r#"{"detail":""}"#), None);
}

#[test]
fn unstructured_message_uses_status_text() {
    assert_eq!(
        unstructured_error_message(Operation::Chat, StatusCode::INTERNAL_SERVER_ERROR, ""),
        "Chat request failed: Internal Server Error"
    );
    assert_eq!(
        unstructured_error_message(Operation::ListFiles, StatusCode::BAD_GATEWAY, "proxy down"),
        "List files request failed: Bad Gateway: proxy down"
    );
}

#[test]
fn status_errors_classify_as_server() {
    let error = BackendApiError::from_status(
        Operation::Chat,
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"detail":"quota exceeded"}"#,
    );
    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(error.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    assert!(matches!(error, BackendApiError::Status { structured: true, .. }));

    let outcome = RequestOutcome::from(Err::<(), _>(error));
    assert_eq!(outcome, RequestOutcome::Failure(Failure::server("quota exceeded")));
}

#[test]
fn decode_errors_classify_as_server() {
    let source = serde_json::from_str::<serde_json::Value>("{not json").expect_err("invalid json");
    let error = BackendApiError::decode(Operation::Plan, source);
    assert_eq!(error.kind(), ErrorKind::Server);
    assert!(error.user_message().starts_with("Plan response could not be decoded"));
}

#[test]
fn config_errors_classify_as_validation() {
    let error = BackendApiError::InvalidConfig("bad timeout".to_string());
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[test]
fn unknown_detail_shape_falls_back_to_error_field() {
    assert_eq!(
        structured_error_message(r#"{"detail":{"code":42},"error":"rate limited"}"#).as_deref(),
        Some("rate limited")
    );
    assert_eq!(structured_error_message(r#"{"detail":7}"#), None);
}
