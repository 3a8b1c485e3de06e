//! 计数器快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sensible_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            events_received: snapshot.events_received,
            decode_failures: snapshot.decode_failures,
            points_rejected: snapshot.points_rejected,
            tags_stripped: snapshot.tags_stripped,
            write_success: snapshot.write_success,
            write_failure: snapshot.write_failure,
            write_latency_ms_total: snapshot.write_latency_ms_total,
            write_latency_ms_count: snapshot.write_latency_ms_count,
            completions: snapshot.completions,
        })),
    )
        .into_response()
}
