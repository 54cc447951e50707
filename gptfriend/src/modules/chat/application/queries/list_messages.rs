use async_trait::async_trait;
use std::sync::Arc;

use super::super::{ApplicationError, QueryHandler};
use crate::modules::chat::domain::Message;
use crate::modules::chat::ports::MessageStore;

/// 列出消息查询
#[derive(Debug, Clone, Default)]
pub struct ListMessagesQuery {
    /// 只取最近 N 条；为空时返回全部
    pub limit: Option<usize>,
}

impl ListMessagesQuery {
    pub fn all() -> Self {
        Self { limit: None }
    }

    pub fn recent(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

/// 列出消息响应
#[derive(Debug, Clone)]
pub struct ListMessagesResponse {
    /// 按时间顺序排列
    pub messages: Vec<Message>,
    /// 存储中的消息总数
    pub total: usize,
}

impl ListMessagesResponse {
    pub fn has_more(&self) -> bool {
        self.messages.len() < self.total
    }
}

/// 列出消息查询处理器
pub struct ListMessagesHandler {
    message_store: Arc<dyn MessageStore>,
}

impl ListMessagesHandler {
    pub fn new(message_store: Arc<dyn MessageStore>) -> Self {
        Self { message_store }
    }
}

#[async_trait]
impl QueryHandler<ListMessagesQuery, ListMessagesResponse> for ListMessagesHandler {
    async fn handle(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        let messages = match query.limit {
            Some(limit) => self.message_store.recent(limit).await?,
            None => self.message_store.all().await?,
        };
        let total = self.message_store.count().await?;

        Ok(ListMessagesResponse { messages, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::NewMessage;
    use crate::modules::chat::infrastructure::InMemoryMessageStore;

    #[tokio::test]
    async fn test_list_messages() {
        let store = Arc::new(InMemoryMessageStore::new());
        for i in 0..5 {
            store
                .append(NewMessage::user(format!("msg {}", i)))
                .await
                .unwrap();
        }

        let handler = ListMessagesHandler::new(store);

        let all = handler.handle(ListMessagesQuery::all()).await.unwrap();
        assert_eq!(all.messages.len(), 5);
        assert!(!all.has_more());

        let recent = handler.handle(ListMessagesQuery::recent(2)).await.unwrap();
        assert_eq!(recent.messages.len(), 2);
        assert_eq!(recent.messages[0].text(), "msg 3");
        assert_eq!(recent.messages[1].text(), "msg 4");
        assert_eq!(recent.total, 5);
        assert!(recent.has_more());
    }
}
