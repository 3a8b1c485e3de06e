//! Handlers 模块

pub mod metrics;
pub mod push;

pub use metrics::*;
pub use push::*;
