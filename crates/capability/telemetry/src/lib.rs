//! 追踪、请求 ID 与调用计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
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

/// 进程级计数器。
pub struct TelemetryMetrics {
    events_received: AtomicU64,
    decode_failures: AtomicU64,
    points_rejected: AtomicU64,
    tags_stripped: AtomicU64,
    write_success: AtomicU64,
    write_failure: AtomicU64,
    write_latency_ms_total: AtomicU64,
    write_latency_ms_count: AtomicU64,
    completions: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            points_rejected: AtomicU64::new(0),
            tags_stripped: AtomicU64::new(0),
            write_success: AtomicU64::new(0),
            write_failure: AtomicU64::new(0),
            write_latency_ms_total: AtomicU64::new(0),
            write_latency_ms_count: AtomicU64::new(0),
            completions: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            points_rejected: self.points_rejected.load(Ordering::Relaxed),
            tags_stripped: self.tags_stripped.load(Ordering::Relaxed),
            write_success: self.write_success.load(Ordering::Relaxed),
            write_failure: self.write_failure.load(Ordering::Relaxed),
            write_latency_ms_total: self.write_latency_ms_total.load(Ordering::Relaxed),
            write_latency_ms_count: self.write_latency_ms_count.load(Ordering::Relaxed),
            completions: self.completions.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录收到的事件数。
pub fn record_event_received() {
    metrics().events_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录载荷解码失败次数。
pub fn record_decode_failure() {
    metrics().decode_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录因未知标签被拒绝的数据点。
pub fn record_point_rejected() {
    metrics().points_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录被剔除的未知标签数。
pub fn record_tags_stripped(count: u64) {
    metrics().tags_stripped.fetch_add(count, Ordering::Relaxed);
}

/// 记录写入成功次数。
pub fn record_write_success() {
    metrics().write_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入失败次数。
pub fn record_write_failure() {
    metrics().write_failure.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入延迟（毫秒）。
pub fn record_write_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .write_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .write_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录完成信号次数。
pub fn record_completion() {
    metrics().completions.fetch_add(1, Ordering::Relaxed);
}
