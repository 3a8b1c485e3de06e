//! InfluxDB 写入实现
//!
//! 通过 1.x 兼容的 `POST /write?db=<database>` 接口写入行协议，
//! 任意 2xx 视为成功（InfluxDB 正常返回 204）。

use crate::connection::http_client;
use crate::error::StorageError;
use crate::line_protocol::encode_line;
use crate::traits::PointWriter;
use domain::WritePoint;
use std::time::Duration;

/// InfluxDB 连接参数。
#[derive(Debug, Clone)]
pub struct InfluxSettings {
    /// 形如 `http://host:8086`。
    pub base_url: String,
    pub database: String,
    /// 为 None 时不设超时。
    pub timeout_ms: Option<u64>,
}

/// InfluxDB 写入器
///
/// 复用进程级共享客户端，本身只持有连接参数。
#[derive(Clone)]
pub struct InfluxWriter {
    client: reqwest::Client,
    settings: InfluxSettings,
}

impl InfluxWriter {
    pub fn new(settings: InfluxSettings) -> Self {
        Self::with_client(http_client().clone(), settings)
    }

    pub fn with_client(client: reqwest::Client, settings: InfluxSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &InfluxSettings {
        &self.settings
    }

    /// 写入地址（不含查询参数）。
    pub fn write_url(&self) -> String {
        format!("{}/write", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl PointWriter for InfluxWriter {
    async fn write(&self, point: &WritePoint) -> Result<(), StorageError> {
        let line = encode_line(point)?;
        let mut request = self
            .client
            .post(self.write_url())
            .query(&[("db", self.settings.database.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(line);
        if let Some(timeout_ms) = self.settings.timeout_ms {
            request = request.timeout(Duration::from_millis(timeout_ms));
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::new(format!(
            "influxdb rejected write: HTTP {}: {}",
            status,
            body.trim()
        )))
    }
}
