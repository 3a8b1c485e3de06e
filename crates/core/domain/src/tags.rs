//! 数据点的标签与字段词表。

pub const FEATURE_TAG: &str = "feature";
pub const DEVICE_TAG: &str = "device";
pub const VALUE_FIELD: &str = "value";

/// 允许写入的传感器特征。
pub const KNOWN_FEATURES: [&str; 6] = [
    "temperature",
    "humidity",
    "pressure",
    "magnetometer",
    "gyroscope",
    "accelerometer",
];

/// 允许写入的设备标识。
pub const KNOWN_DEVICES: [&str; 8] = [
    "sensi1", "sensi2", "sensi3", "sensi4", "sensi5", "sensi6", "sensi7", "sensi8",
];
