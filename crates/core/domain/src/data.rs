use std::collections::BTreeMap;

/// 设备上报的 JSON 载荷，`value` 为带包裹字符的数字字面量。
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SensorPayload {
    pub feature: String,
    pub value: String,
}

/// 解析后的测量值。
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// 已转小写。
    pub feature: String,
    pub value: f64,
}

/// 待写入时序库的数据点。
#[derive(Debug, Clone, PartialEq)]
pub struct WritePoint {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, f64>,
}

impl WritePoint {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<f64> {
        self.fields.get(key).copied()
    }
}
