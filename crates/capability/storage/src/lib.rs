//! # Sensible Storage 模块
//!
//! 时序数据点的写出层。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`PointWriter` 异步写入接口
//! 2. **编码层** (`line_protocol.rs`)：WritePoint → InfluxDB 行协议
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **连接管理层** (`connection.rs`)：进程级共享 HTTP 客户端
//! 5. **实现层**：
//!    - `influx.rs`：InfluxDB 1.x `/write` 接口（生产环境使用）
//!    - `in_memory.rs`：内存实现（用于测试和空跑）
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use sensible_storage::{InfluxSettings, InfluxWriter, PointWriter};
//!
//! let writer = InfluxWriter::new(InfluxSettings {
//!     base_url: "http://localhost:8086".to_string(),
//!     database: "sensible".to_string(),
//!     timeout_ms: None,
//! });
//! writer.write(&point).await?;
//! ```
//!
//! ## 设计约束
//!
//! - 单点写入，无批量、无重试；失败直接返回 `StorageError`
//! - 不携带时间戳，由服务端按接收时间落点

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod influx;
pub mod line_protocol;
pub mod traits;

pub use connection::*;
pub use error::*;
pub use in_memory::InMemoryPointWriter;
pub use influx::{InfluxSettings, InfluxWriter};
pub use line_protocol::encode_line;
pub use traits::*;
