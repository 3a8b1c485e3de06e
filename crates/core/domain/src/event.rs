//! 消息总线投递的原始事件。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 后台函数形态的事件：`{ data: { data, attributes } }`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubsubEvent {
    pub data: PubsubMessage,
}

/// Pub/Sub 消息本体。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
    /// base64 编码的 JSON 载荷。
    pub data: String,
    #[serde(default)]
    pub attributes: MessageAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,
}

/// 消息属性，`deviceId` 标识上报设备。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageAttributes {
    /// 缺失时为空串，由标签策略处理。
    #[serde(rename = "deviceId", default)]
    pub device_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl PubsubMessage {
    pub fn new(data: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            attributes: MessageAttributes {
                device_id: device_id.into(),
                extra: BTreeMap::new(),
            },
            message_id: None,
            publish_time: None,
        }
    }
}

impl From<PubsubMessage> for PubsubEvent {
    fn from(data: PubsubMessage) -> Self {
        Self { data }
    }
}
