//! 稳定的 DTO 与 API 响应契约。

use domain::{PubsubEvent, PubsubMessage};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// Pub/Sub 推送信封。
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    pub message: PubsubMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// 推送端点接受的请求体：推送信封或后台函数事件。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InboundBody {
    Push(PushEnvelope),
    Background(PubsubEvent),
}

impl InboundBody {
    /// 订阅名（仅推送信封携带）。
    pub fn subscription(&self) -> Option<&str> {
        match self {
            InboundBody::Push(envelope) => envelope.subscription.as_deref(),
            InboundBody::Background(_) => None,
        }
    }

    pub fn into_event(self) -> PubsubEvent {
        match self {
            InboundBody::Push(envelope) => PubsubEvent::from(envelope.message),
            InboundBody::Background(event) => event,
        }
    }
}

/// 指标快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub events_received: u64,
    pub decode_failures: u64,
    pub points_rejected: u64,
    pub tags_stripped: u64,
    pub write_success: u64,
    pub write_failure: u64,
    pub write_latency_ms_total: u64,
    pub write_latency_ms_count: u64,
    pub completions: u64,
}
