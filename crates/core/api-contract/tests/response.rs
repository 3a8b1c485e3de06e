use api_contract::ApiResponse;

#[test]
fn api_response_success() {
    let response = ApiResponse::success("ok");
    assert!(response.success);
    assert!(response.data.is_some());
    assert!(response.error.is_none());
}

#[test]
fn api_response_error_serializes_code() {
    let response = ApiResponse::<()>::error("INVALID.PAYLOAD", "invalid base64 payload");
    assert!(!response.success);
    assert!(response.data.is_none());

    let value = serde_json::to_value(&response).expect("serialize");
    assert_eq!(value["error"]["code"], "INVALID.PAYLOAD");
    assert_eq!(value["error"]["message"], "invalid base64 payload");
    assert!(value["data"].is_null());
}
