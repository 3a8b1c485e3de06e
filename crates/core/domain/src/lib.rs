pub mod data;
pub mod event;
pub mod tags;

pub use data::{Measurement, SensorPayload, WritePoint};
pub use event::{MessageAttributes, PubsubEvent, PubsubMessage};
pub use tags::{DEVICE_TAG, FEATURE_TAG, KNOWN_DEVICES, KNOWN_FEATURES, VALUE_FIELD};
