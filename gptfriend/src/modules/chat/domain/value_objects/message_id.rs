use serde::{Deserialize, Serialize};
use std::fmt;

/// 消息唯一标识符
///
/// 值对象：由消息存储在插入时分配，单调递增，决定消息的全序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    /// 从存储层的行 ID 创建
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// 获取内部整数值
    pub fn value(&self) -> i64 {
        self.0
    }

    /// 下一个 ID
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<MessageId> for i64 {
    fn from(id: MessageId) -> Self {
        id.0
    }
}
