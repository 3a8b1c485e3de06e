//! 函数运行配置加载。

use reqwest::Url;
use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 函数运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub influx_host: String,
    pub influx_port: u16,
    pub influx_database: String,
    pub influx_measurement: String,
    pub influx_timeout_ms: Option<u64>,
    /// 由 host 与 port 解析出的 InfluxDB 根地址。
    influx_url: Url,
    /// true：未知标签剔除后写入；false：拒绝整点。
    pub strip_unknown: bool,
    /// true：写入完成后再发完成信号；false：发出写入即完成。
    pub await_write: bool,
    /// true：解码失败时调用失败，不发完成信号。
    pub fail_on_decode_error: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let influx_host = read_optional("SENSIBLE_INFLUX_HOST")
            .ok_or_else(|| ConfigError::Missing("SENSIBLE_INFLUX_HOST".to_string()))?;
        let http_addr =
            env::var("SENSIBLE_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let influx_port = read_u16_with_default("SENSIBLE_INFLUX_PORT", 8086)?;
        let influx_database =
            env::var("SENSIBLE_INFLUX_DATABASE").unwrap_or_else(|_| "sensible".to_string());
        let influx_measurement =
            env::var("SENSIBLE_INFLUX_MEASUREMENT").unwrap_or_else(|_| "measurement".to_string());
        let influx_timeout_ms =
            read_optional_u64("SENSIBLE_INFLUX_TIMEOUT_MS")?.filter(|value| *value > 0);
        let influx_url = resolve_influx_url(&influx_host, influx_port)?;
        let strip_unknown = read_bool_with_default("SENSIBLE_STRIP_UNKNOWN", true)?;
        let await_write = read_bool_with_default("SENSIBLE_AWAIT_WRITE", false)?;
        let fail_on_decode_error = read_bool_with_default("SENSIBLE_FAIL_ON_DECODE_ERROR", false)?;

        Ok(Self {
            http_addr,
            influx_host,
            influx_port,
            influx_database,
            influx_measurement,
            influx_timeout_ms,
            influx_url,
            strip_unknown,
            await_write,
            fail_on_decode_error,
        })
    }

    /// InfluxDB 根地址（不带末尾 `/`）。
    pub fn influx_base_url(&self) -> String {
        self.influx_url.as_str().trim_end_matches('/').to_string()
    }
}

/// host 未带 scheme 时按 http 处理；host 自带端口时保留该端口，否则使用 `port`。
fn resolve_influx_url(host: &str, port: u16) -> Result<Url, ConfigError> {
    let invalid = |reason: String| {
        ConfigError::Invalid("SENSIBLE_INFLUX_HOST".to_string(), format!("{host}: {reason}"))
    };
    let host = host.trim();
    let raw = if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    };
    let mut url = Url::parse(&raw).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    if url.port().is_none() && !has_explicit_port(&raw) {
        url.set_port(Some(port))
            .map_err(|_| invalid("cannot carry a port".to_string()))?;
    }
    Ok(url)
}

/// `Url` 会丢弃与 scheme 默认值相同的端口（如 `http://h:80`），这里按原文判断。
fn has_explicit_port(raw: &str) -> bool {
    let authority = raw
        .split_once("://")
        .map_or(raw, |(_, rest)| rest)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, rest)| rest);
    match host_port.rsplit_once(':') {
        Some((host, port)) => {
            !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!host.starts_with('[') || host.ends_with(']'))
        }
        None => false,
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_optional_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        Err(_) => Ok(None),
    }
}

fn read_bool_with_default(key: &str, default: bool) -> Result<bool, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(default),
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}
