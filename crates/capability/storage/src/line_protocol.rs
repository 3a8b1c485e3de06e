//! InfluxDB 行协议编码
//!
//! `measurement[,tag=value...] field=value[,field=value...]`
//!
//! - 标签按键排序（`BTreeMap` 保证）
//! - 空标签值不输出（服务端会拒绝）
//! - 不写时间戳

use crate::error::StorageError;
use domain::WritePoint;

/// 编码单个数据点。
pub fn encode_line(point: &WritePoint) -> Result<String, StorageError> {
    if point.measurement.is_empty() {
        return Err(StorageError::new("measurement name required"));
    }
    if point.fields.is_empty() {
        return Err(StorageError::new("point has no fields"));
    }

    let mut line = escape(&point.measurement, &[',', ' ']);
    for (key, value) in &point.tags {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape(key, &[',', '=', ' ']));
        line.push('=');
        line.push_str(&escape(value, &[',', '=', ' ']));
    }

    let mut separator = ' ';
    for (key, value) in &point.fields {
        if !value.is_finite() {
            return Err(StorageError::new(format!("field {key} is not finite")));
        }
        line.push(separator);
        line.push_str(&escape(key, &[',', '=', ' ']));
        line.push('=');
        line.push_str(&value.to_string());
        separator = ',';
    }
    Ok(line)
}

fn escape(raw: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if special.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
