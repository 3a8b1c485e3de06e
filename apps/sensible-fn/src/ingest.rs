//! 采集调用处理模块
//!
//! 一次调用对应一条 Pub/Sub 消息：解码 → 解析 → 构造数据点 → 写出 → 发完成信号。
//! 写入失败只记日志，不重试，也不影响完成信号。

use domain::{PubsubEvent, WritePoint};
use sensible_config::AppConfig;
use sensible_ingest::{IngestError, decode_event};
use sensible_normalize::{Normalizer, TagSchema, UnknownTagPolicy};
use sensible_storage::{InfluxSettings, InfluxWriter, PointWriter};
use sensible_telemetry::{
    record_completion, record_decode_failure, record_event_received, record_point_rejected,
    record_tags_stripped, record_write_failure, record_write_latency_ms, record_write_success,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, warn};

/// 完成信号与写入的先后关系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// 发出写入后立即完成，写入结果只体现在日志中。
    ///
    /// 宿主在写入结束前回收进程时，该次写入会丢失。
    FireAndForget,
    /// 等待写入结束（无论成败）后再完成。
    AwaitWrite,
}

/// 载荷解码失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailurePolicy {
    /// 记录日志并正常完成。
    Complete,
    /// 不发完成信号，把错误交给宿主（消息可能被重投）。
    Fail,
}

/// 处理器参数
#[derive(Debug, Clone, Copy)]
pub struct HandlerOptions {
    pub completion: CompletionMode,
    pub on_decode_error: DecodeFailurePolicy,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            completion: CompletionMode::FireAndForget,
            on_decode_error: DecodeFailurePolicy::Complete,
        }
    }
}

/// 单次写入的结果
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome {
    Written,
    Failed(String),
}

/// 一次调用的去向
#[derive(Debug)]
pub enum Dispatch {
    /// 未写入（解码失败已记录，或数据点被拒绝）。
    Skipped,
    /// 已等待写入结束。
    Written(WriteOutcome),
    /// 写入仍在后台进行。
    Spawned(JoinHandle<WriteOutcome>),
}

/// 调用失败（仅在 `DecodeFailurePolicy::Fail` 下出现）
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("payload decode failed: {0}")]
    Decode(#[from] IngestError),
    #[error("malformed delivery body: {0}")]
    Envelope(#[from] serde_json::Error),
}

/// 采集处理器
///
/// 进程内只构造一次，所有调用共享同一个写入器。
#[derive(Clone)]
pub struct IngestionHandler {
    /// 将 Measurement 与设备标识组装为数据点
    normalizer: Normalizer,
    /// 时序库写入器
    writer: Arc<dyn PointWriter>,
    options: HandlerOptions,
}

impl IngestionHandler {
    pub fn new(
        normalizer: Normalizer,
        writer: Arc<dyn PointWriter>,
        options: HandlerOptions,
    ) -> Self {
        Self {
            normalizer,
            writer,
            options,
        }
    }

    /// 按运行配置装配 InfluxDB 写入器与处理器
    pub fn from_config(config: &AppConfig) -> Self {
        let writer = InfluxWriter::new(InfluxSettings {
            base_url: config.influx_base_url(),
            database: config.influx_database.clone(),
            timeout_ms: config.influx_timeout_ms,
        });
        info!(
            "influx target: {}/write?db={} measurement={}",
            config.influx_base_url(),
            config.influx_database,
            config.influx_measurement
        );
        let normalizer = Normalizer::new(
            config.influx_measurement.clone(),
            TagSchema::sensible(),
            UnknownTagPolicy::from_strip_unknown(config.strip_unknown),
        );
        let options = HandlerOptions {
            completion: if config.await_write {
                CompletionMode::AwaitWrite
            } else {
                CompletionMode::FireAndForget
            },
            on_decode_error: if config.fail_on_decode_error {
                DecodeFailurePolicy::Fail
            } else {
                DecodeFailurePolicy::Complete
            },
        };
        Self::new(normalizer, Arc::new(writer), options)
    }

    pub fn options(&self) -> HandlerOptions {
        self.options
    }

    /// 处理一条事件
    ///
    /// 返回 `Ok` 时 `done` 恰好被调用一次；返回 `Err` 时 `done` 不会被调用。
    pub async fn handle<F>(&self, event: PubsubEvent, done: F) -> Result<Dispatch, HandlerError>
    where
        F: FnOnce() + Send,
    {
        record_event_received();
        let message = event.data;
        let message_id = message.message_id.clone().unwrap_or_default();
        info!(
            target: "sensible.ingest",
            message_id = %message_id,
            device_id = %message.attributes.device_id,
            data_size = message.data.len(),
            "event_received"
        );

        // 1. 解码：base64 → JSON → Measurement
        let decoded = match decode_event(&message) {
            Ok(decoded) => decoded,
            Err(err) => return self.decode_failed(err.into(), &message_id, done),
        };

        // 2. 构造数据点，按标签策略处理未知取值
        let normalized = match self
            .normalizer
            .normalize(&decoded.measurement, &decoded.device_id)
        {
            Ok(normalized) => normalized,
            Err(err) => {
                record_point_rejected();
                warn!(
                    target: "sensible.ingest",
                    message_id = %message_id,
                    payload = %decoded.payload_text,
                    error = %err,
                    "point_rejected"
                );
                complete(done, &message_id);
                return Ok(Dispatch::Skipped);
            }
        };
        if !normalized.stripped.is_empty() {
            record_tags_stripped(normalized.stripped.len() as u64);
            warn!(
                target: "sensible.ingest",
                message_id = %message_id,
                stripped = ?normalized.stripped,
                "unknown_tags_stripped"
            );
        }

        // 3. 写出
        let write = write_point(
            self.writer.clone(),
            normalized.point,
            decoded.payload_text,
            decoded.device_id,
            message_id.clone(),
        );
        match self.options.completion {
            CompletionMode::FireAndForget => {
                let handle = tokio::spawn(write.instrument(tracing::Span::current()));
                complete(done, &message_id);
                Ok(Dispatch::Spawned(handle))
            }
            CompletionMode::AwaitWrite => {
                let outcome = write.await;
                complete(done, &message_id);
                Ok(Dispatch::Written(outcome))
            }
        }
    }

    /// 处理无法解析出事件的投递体，与载荷解码失败走同一策略
    pub fn handle_malformed<F>(
        &self,
        err: serde_json::Error,
        done: F,
    ) -> Result<Dispatch, HandlerError>
    where
        F: FnOnce() + Send,
    {
        record_event_received();
        self.decode_failed(err.into(), "", done)
    }

    fn decode_failed<F>(
        &self,
        err: HandlerError,
        message_id: &str,
        done: F,
    ) -> Result<Dispatch, HandlerError>
    where
        F: FnOnce() + Send,
    {
        record_decode_failure();
        warn!(
            target: "sensible.ingest",
            message_id = %message_id,
            error = %err,
            "payload_decode_failed"
        );
        match self.options.on_decode_error {
            DecodeFailurePolicy::Complete => {
                complete(done, message_id);
                Ok(Dispatch::Skipped)
            }
            DecodeFailurePolicy::Fail => Err(err),
        }
    }
}

fn complete<F: FnOnce()>(done: F, message_id: &str) {
    record_completion();
    info!(target: "sensible.ingest", message_id = %message_id, "invocation_completed");
    done();
}

/// 写出单个数据点并记录结果，错误不向上传播
async fn write_point(
    writer: Arc<dyn PointWriter>,
    point: WritePoint,
    payload_text: String,
    device_id: String,
    message_id: String,
) -> WriteOutcome {
    let started_at = Instant::now();
    match writer.write(&point).await {
        Ok(()) => {
            record_write_success();
            record_write_latency_ms(started_at.elapsed().as_millis() as u64);
            info!(
                target: "sensible.ingest",
                message_id = %message_id,
                payload = %payload_text,
                device_id = %device_id,
                "point_written"
            );
            WriteOutcome::Written
        }
        Err(err) => {
            record_write_failure();
            error!(
                target: "sensible.ingest",
                message_id = %message_id,
                payload = %payload_text,
                device_id = %device_id,
                error = %err,
                "point_write_failed"
            );
            WriteOutcome::Failed(err.to_string())
        }
    }
}
