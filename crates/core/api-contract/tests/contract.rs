use api_contract::{InboundBody, MetricsSnapshotDto};
use serde_json::Value;

#[test]
fn push_envelope_is_accepted() {
    let payload = r#"{
        "message": {
            "data": "e30=",
            "attributes": {"deviceId": "sensi2"},
            "messageId": "7",
            "publishTime": "2026-10-18T00:00:00Z"
        },
        "subscription": "projects/demo/subscriptions/sense"
    }"#;
    let body: InboundBody = serde_json::from_str(payload).expect("parse");
    assert!(matches!(body, InboundBody::Push(_)));
    assert_eq!(body.subscription(), Some("projects/demo/subscriptions/sense"));

    let event = body.into_event();
    assert_eq!(event.data.data, "e30=");
    assert_eq!(event.data.attributes.device_id, "sensi2");
    assert_eq!(event.data.message_id.as_deref(), Some("7"));
}

#[test]
fn background_event_is_accepted() {
    let payload = r#"{"data":{"data":"e30=","attributes":{"deviceId":"sensi5"}}}"#;
    let body: InboundBody = serde_json::from_str(payload).expect("parse");
    assert!(matches!(body, InboundBody::Background(_)));
    assert_eq!(body.subscription(), None);
    assert_eq!(body.into_event().data.attributes.device_id, "sensi5");
}

#[test]
fn unrelated_body_is_rejected() {
    let result = serde_json::from_str::<InboundBody>(r#"{"hello":"world"}"#);
    assert!(result.is_err());
}

#[test]
fn metrics_snapshot_is_camel_case() {
    let dto = MetricsSnapshotDto {
        events_received: 1,
        decode_failures: 0,
        points_rejected: 0,
        tags_stripped: 0,
        write_success: 1,
        write_failure: 0,
        write_latency_ms_total: 3,
        write_latency_ms_count: 1,
        completions: 1,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value.get("eventsReceived"), Some(&Value::from(1)));
    assert!(value.get("writeLatencyMsTotal").is_some());
    assert!(value.get("events_received").is_none());
}
