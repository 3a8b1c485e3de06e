use domain::{PubsubEvent, WritePoint};

#[test]
fn pubsub_event_deserializes() {
    let event: PubsubEvent = serde_json::from_value(serde_json::json!({
        "data": {
            "data": "e30=",
            "attributes": { "deviceId": "sensi3", "projectId": "demo" },
            "messageId": "42"
        }
    }))
    .expect("event");

    assert_eq!(event.data.data, "e30=");
    assert_eq!(event.data.attributes.device_id, "sensi3");
    assert_eq!(
        event.data.attributes.extra.get("projectId").map(String::as_str),
        Some("demo")
    );
    assert_eq!(event.data.message_id.as_deref(), Some("42"));
}

#[test]
fn missing_device_id_defaults_to_empty() {
    let event: PubsubEvent =
        serde_json::from_value(serde_json::json!({ "data": { "data": "e30=" } })).expect("event");
    assert!(event.data.attributes.device_id.is_empty());
}

#[test]
fn write_point_accessors() {
    let mut point = WritePoint::new("measurement");
    point.tags.insert("device".to_string(), "sensi1".to_string());
    point.fields.insert("value".to_string(), 1.5);

    assert_eq!(point.tag("device"), Some("sensi1"));
    assert_eq!(point.tag("feature"), None);
    assert_eq!(point.field("value"), Some(1.5));
}
