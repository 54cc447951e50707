use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::message_feed::MessageFeed;
use crate::modules::chat::domain::{Message, MessageId, NewMessage};
use crate::modules::chat::ports::{MessageStore, MessageStream, StoreError};

struct InMemoryState {
    messages: Vec<Message>,
    /// 清空后也不回退，保证 ID 在进程内唯一
    next_id: MessageId,
}

/// 内存消息存储
///
/// 用于测试，以及数据库无法打开时的降级方案
pub struct InMemoryMessageStore {
    state: RwLock<InMemoryState>,
    feed: MessageFeed,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(InMemoryState {
                messages: Vec::new(),
                next_id: MessageId::new(1),
            }),
            feed: MessageFeed::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: NewMessage) -> Result<Message, StoreError> {
        let mut state = self.state.write().await;

        let id = state.next_id;
        state.next_id = id.next();

        let message = message.into_message(id, Utc::now());
        state.messages.push(message.clone());
        self.feed.push(message.clone());

        Ok(message)
    }

    async fn all(&self) -> Result<Vec<Message>, StoreError> {
        let state = self.state.read().await;
        Ok(state.messages.clone())
    }

    fn watch(&self) -> MessageStream {
        self.feed.subscribe()
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Message>, StoreError> {
        let state = self.state.read().await;
        let start = state.messages.len().saturating_sub(limit);
        Ok(state.messages[start..].to_vec())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let state = self.state.read().await;
        Ok(state.messages.len())
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let mut state = self.state.write().await;
        let removed = state.messages.len();
        state.messages.clear();
        self.feed.reset();
        Ok(removed)
    }
}
