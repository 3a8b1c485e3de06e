use domain::{
    DEVICE_TAG, FEATURE_TAG, KNOWN_DEVICES, KNOWN_FEATURES, Measurement, VALUE_FIELD, WritePoint,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// 规范化错误。
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NormalizeError {
    #[error("unknown {key} tag value: {value:?}")]
    UnknownTag { key: String, value: String },
    #[error("invalid field {0}: not a finite number")]
    InvalidField(String),
}

/// 标签值不在白名单内时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownTagPolicy {
    /// 剔除该标签，数据点照常写入。
    Strip,
    /// 拒绝整个数据点。
    Reject,
}

impl UnknownTagPolicy {
    pub fn from_strip_unknown(strip_unknown: bool) -> Self {
        if strip_unknown { Self::Strip } else { Self::Reject }
    }
}

/// 标签白名单：未登记的标签键不受约束。
#[derive(Debug, Clone, Default)]
pub struct TagSchema {
    allowed: BTreeMap<String, BTreeSet<String>>,
}

impl TagSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// 传感器特征与设备的固定词表。
    pub fn sensible() -> Self {
        Self::new()
            .with_tag(FEATURE_TAG, KNOWN_FEATURES)
            .with_tag(DEVICE_TAG, KNOWN_DEVICES)
    }

    pub fn with_tag<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn allows(&self, key: &str, value: &str) -> bool {
        match self.allowed.get(key) {
            Some(values) => values.contains(value),
            None => true,
        }
    }
}

/// 规范化结果。
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub point: WritePoint,
    /// 被剔除的 (标签键, 标签值)。
    pub stripped: Vec<(String, String)>,
}

/// Measurement + 设备标识 → WritePoint。
#[derive(Clone)]
pub struct Normalizer {
    measurement: String,
    schema: Arc<TagSchema>,
    policy: UnknownTagPolicy,
}

impl Normalizer {
    pub fn new(
        measurement: impl Into<String>,
        schema: TagSchema,
        policy: UnknownTagPolicy,
    ) -> Self {
        Self {
            measurement: measurement.into(),
            schema: Arc::new(schema),
            policy,
        }
    }

    pub fn policy(&self) -> UnknownTagPolicy {
        self.policy
    }

    pub fn normalize(
        &self,
        measurement: &Measurement,
        device_id: &str,
    ) -> Result<NormalizedPoint, NormalizeError> {
        if !measurement.value.is_finite() {
            return Err(NormalizeError::InvalidField(VALUE_FIELD.to_string()));
        }

        let mut point = WritePoint::new(self.measurement.clone());
        let mut stripped = Vec::new();
        for (key, value) in [
            (FEATURE_TAG, measurement.feature.as_str()),
            (DEVICE_TAG, device_id),
        ] {
            if self.schema.allows(key, value) {
                point.tags.insert(key.to_string(), value.to_string());
                continue;
            }
            match self.policy {
                UnknownTagPolicy::Strip => stripped.push((key.to_string(), value.to_string())),
                UnknownTagPolicy::Reject => {
                    return Err(NormalizeError::UnknownTag {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }
        point
            .fields
            .insert(VALUE_FIELD.to_string(), measurement.value);

        Ok(NormalizedPoint { point, stripped })
    }
}
