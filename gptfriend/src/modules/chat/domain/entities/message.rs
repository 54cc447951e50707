use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::value_objects::{MessageId, Sender};

/// 待写入的消息
///
/// ID 和时间戳由消息存储在追加时分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    text: String,
    sender: Sender,
}

impl NewMessage {
    /// 创建用户消息
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    /// 创建助手消息（包括合成的错误提示）
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Assistant,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// 由存储分配 ID 后转为已持久化的消息
    pub fn into_message(self, id: MessageId, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            text: self.text,
            sender: self.sender,
            created_at,
        }
    }
}

/// 消息实体
///
/// 消息一经写入不可修改，也不能单独删除；唯一的删除操作是清空整个对话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 消息唯一标识（插入顺序）
    id: MessageId,
    /// 消息文本
    text: String,
    /// 发送方
    sender: Sender,
    /// 创建时间
    created_at: DateTime<Utc>,
}

impl Message {
    /// 从存储恢复
    pub fn restore(id: MessageId, text: String, sender: Sender, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            sender,
            created_at,
        }
    }

    // Getters
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
