//! 写入接口 Trait 定义

use crate::error::StorageError;
use async_trait::async_trait;
use domain::WritePoint;

/// 数据点写入接口
///
/// 每次调用写出一个数据点；实现方不得重试。
#[async_trait]
pub trait PointWriter: Send + Sync {
    async fn write(&self, point: &WritePoint) -> Result<(), StorageError>;
}
