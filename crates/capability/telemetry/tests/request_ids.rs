use sensible_telemetry::{metrics, new_request_ids, record_tags_stripped, record_write_latency_ms};

#[test]
fn request_ids_non_empty() {
    let ids = new_request_ids();
    assert!(!ids.request_id.is_empty());
    assert!(!ids.trace_id.is_empty());
    assert_ne!(ids.request_id, ids.trace_id);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_tags_stripped(2);
    record_write_latency_ms(15);
    let after = metrics().snapshot();

    assert!(after.tags_stripped >= before.tags_stripped + 2);
    assert!(after.write_latency_ms_total >= before.write_latency_ms_total + 15);
    assert!(after.write_latency_ms_count >= before.write_latency_ms_count + 1);
}
