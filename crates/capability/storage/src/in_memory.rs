//! 数据点内存写入实现
//!
//! 仅用于本地测试和空跑。

use crate::error::StorageError;
use crate::traits::PointWriter;
use domain::WritePoint;
use std::sync::RwLock;

/// 数据点内存存储
#[derive(Default)]
pub struct InMemoryPointWriter {
    points: RwLock<Vec<WritePoint>>,
}

impl InMemoryPointWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已写入的数据点数量
    pub fn len(&self) -> usize {
        self.points.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 已写入数据点的拷贝（按写入顺序）
    pub fn points(&self) -> Vec<WritePoint> {
        self.points.read().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl PointWriter for InMemoryPointWriter {
    async fn write(&self, point: &WritePoint) -> Result<(), StorageError> {
        let mut points = self
            .points
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        points.push(point.clone());
        Ok(())
    }
}
