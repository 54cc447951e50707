use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

use super::super::domain::{Message, NewMessage};

/// 存储错误类型
///
/// 本地持久化失败属于意外情况，不参与正常控制流
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Corrupted row: {0}")]
    Corrupted(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

impl From<tokio_rusqlite::Error> for StoreError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// 消息序列的实时视图
///
/// 订阅后立即产出当前序列，此后每次追加或清空都会产出最新序列
pub type MessageStream = Pin<Box<dyn Stream<Item = Vec<Message>> + Send>>;

/// 消息存储端口
///
/// 按插入顺序排列的只追加日志，是展示层唯一的数据来源
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// 追加消息，分配下一个 ID
    async fn append(&self, message: NewMessage) -> Result<Message, StoreError>;

    /// 获取全部消息（按 ID 升序）
    async fn all(&self) -> Result<Vec<Message>, StoreError>;

    /// 订阅实时序列
    fn watch(&self) -> MessageStream;

    /// 获取最近的 `limit` 条消息（按时间顺序，最早的在前）
    async fn recent(&self, limit: usize) -> Result<Vec<Message>, StoreError>;

    /// 获取消息数量
    async fn count(&self) -> Result<usize, StoreError>;

    /// 清空全部消息，返回删除的数量
    async fn clear(&self) -> Result<usize, StoreError>;
}
