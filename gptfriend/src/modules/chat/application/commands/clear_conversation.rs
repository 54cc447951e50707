use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::super::{ApplicationError, CommandHandler};
use crate::modules::chat::ports::MessageStore;

/// 清空对话命令
#[derive(Debug, Clone, Default)]
pub struct ClearConversationCommand;

/// 清空对话响应
#[derive(Debug, Clone)]
pub struct ClearConversationResponse {
    /// 删除的消息数量
    pub removed: usize,
}

/// 清空对话命令处理器
///
/// 不影响补全客户端的会话状态
pub struct ClearConversationHandler {
    message_store: Arc<dyn MessageStore>,
}

impl ClearConversationHandler {
    pub fn new(message_store: Arc<dyn MessageStore>) -> Self {
        Self { message_store }
    }
}

#[async_trait]
impl CommandHandler<ClearConversationCommand, ClearConversationResponse>
    for ClearConversationHandler
{
    async fn handle(
        &self,
        _command: ClearConversationCommand,
    ) -> Result<ClearConversationResponse, ApplicationError> {
        let removed = self.message_store.clear().await?;
        info!("Conversation cleared ({} messages removed)", removed);
        Ok(ClearConversationResponse { removed })
    }
}
