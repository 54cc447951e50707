use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::super::notices::{completion_failure_notice, NOT_INITIALIZED_NOTICE};
use super::super::{ApplicationError, CommandHandler};
use crate::modules::chat::domain::{ConversationWindow, Message, NewMessage, DEFAULT_SYSTEM_PROMPT};
use crate::modules::chat::ports::{CompletionClient, CompletionError, MessageStore};

/// 发送消息命令
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// 用户输入（未修剪）
    pub text: String,
}

impl SendMessageCommand {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 助手回复的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// 远程补全成功，回复为原文
    Replied,
    /// 会话未就绪，回复为固定提示
    NotReady,
    /// 补全失败，回复为 `Error: ...`
    Failed(CompletionError),
}

impl SendOutcome {
    pub fn is_replied(&self) -> bool {
        matches!(self, SendOutcome::Replied)
    }
}

/// 发送消息响应
#[derive(Debug, Clone)]
pub struct SendMessageResponse {
    /// 已存储的用户消息
    pub user_message: Message,
    /// 已存储的助手消息
    pub assistant_message: Message,
    pub outcome: SendOutcome,
}

/// 发送消息命令处理器
pub struct SendMessageHandler {
    message_store: Arc<dyn MessageStore>,
    completion_client: Arc<dyn CompletionClient>,
    window: ConversationWindow,
    system_prompt: String,
}

impl SendMessageHandler {
    pub fn new(
        message_store: Arc<dyn MessageStore>,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            message_store,
            completion_client,
            window: ConversationWindow::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    pub fn with_window(mut self, window: ConversationWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// 读取发送路径的历史（包含刚写入的用户消息）
    async fn conversation_history(&self) -> Result<Vec<Message>, ApplicationError> {
        let recent = self.message_store.recent(self.window.limit()).await?;
        Ok(self.window.select(recent))
    }
}

#[async_trait]
impl CommandHandler<SendMessageCommand, SendMessageResponse> for SendMessageHandler {
    async fn handle(
        &self,
        command: SendMessageCommand,
    ) -> Result<SendMessageResponse, ApplicationError> {
        // 验证输入
        let text = command.text.trim();
        if text.is_empty() {
            return Err(ApplicationError::Validation(
                "Message text cannot be empty".to_string(),
            ));
        }

        let user_message = self.message_store.append(NewMessage::user(text)).await?;
        debug!("Stored user message {}", user_message.id());

        let history = self.conversation_history().await?;

        if !self.completion_client.is_ready() {
            warn!("Completion client not ready, replying with notice");
            let assistant_message = self
                .message_store
                .append(NewMessage::assistant(NOT_INITIALIZED_NOTICE))
                .await?;
            return Ok(SendMessageResponse {
                user_message,
                assistant_message,
                outcome: SendOutcome::NotReady,
            });
        }

        let (reply, outcome) = match self
            .completion_client
            .complete(text, &history, &self.system_prompt)
            .await
        {
            Ok(reply) => {
                info!("Completion received ({} chars)", reply.chars().count());
                (reply, SendOutcome::Replied)
            }
            Err(e) => {
                warn!("Completion failed: {}", e);
                (completion_failure_notice(&e), SendOutcome::Failed(e))
            }
        };

        let assistant_message = self
            .message_store
            .append(NewMessage::assistant(reply))
            .await?;

        Ok(SendMessageResponse {
            user_message,
            assistant_message,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::application::testing::MockCompletionClient;
    use crate::modules::chat::domain::Sender;
    use crate::modules::chat::infrastructure::InMemoryMessageStore;

    fn handler(
        store: Arc<InMemoryMessageStore>,
        client: Arc<MockCompletionClient>,
    ) -> SendMessageHandler {
        SendMessageHandler::new(store, client)
    }

    #[tokio::test]
    async fn test_send_message_replied() {
        let store = Arc::new(InMemoryMessageStore::new());
        let client = Arc::new(MockCompletionClient::ready(Ok("yo, what's good?")));
        let handler = handler(store.clone(), client.clone());

        let response = handler
            .handle(SendMessageCommand::new("  hey  "))
            .await
            .unwrap();

        assert_eq!(response.outcome, SendOutcome::Replied);
        assert_eq!(response.user_message.text(), "hey");
        assert_eq!(response.assistant_message.text(), "yo, what's good?");

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].sender(), Sender::User);
        assert_eq!(all[1].sender(), Sender::Assistant);

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_message, "hey");
        assert_eq!(calls[0].system_prompt, DEFAULT_SYSTEM_PROMPT);
        // 历史包含刚写入的用户消息
        assert_eq!(calls[0].history, vec!["hey".to_string()]);
    }

    #[tokio::test]
    async fn test_send_blank_message() {
        let store = Arc::new(InMemoryMessageStore::new());
        let client = Arc::new(MockCompletionClient::ready(Ok("unused")));
        let handler = handler(store.clone(), client.clone());

        for blank in ["", "   ", "\n\t"] {
            let result = handler.handle(SendMessageCommand::new(blank)).await;
            assert!(matches!(result, Err(ApplicationError::Validation(_))));
        }

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_send_when_not_ready() {
        let store = Arc::new(InMemoryMessageStore::new());
        let client = Arc::new(MockCompletionClient::uninitialized());
        let handler = handler(store.clone(), client.clone());

        let response = handler.handle(SendMessageCommand::new("hi")).await.unwrap();

        assert_eq!(response.outcome, SendOutcome::NotReady);
        assert_eq!(response.assistant_message.text(), NOT_INITIALIZED_NOTICE);
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_becomes_error_message() {
        let store = Arc::new(InMemoryMessageStore::new());
        let client = Arc::new(MockCompletionClient::ready(Err(
            CompletionError::TransportOrApiError("boom".to_string()),
        )));
        let handler = handler(store.clone(), client);

        let response = handler.handle(SendMessageCommand::new("hi")).await.unwrap();

        assert_eq!(response.assistant_message.text(), "Error: boom");
        assert!(!response.outcome.is_replied());
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_history_excludes_config_errors() {
        let store = Arc::new(InMemoryMessageStore::new());
        store
            .append(NewMessage::assistant(
                "API key not configured. Please set OPENAI_API_KEY and restart.",
            ))
            .await
            .unwrap();
        store
            .append(NewMessage::assistant("FATAL on init: boom. Check the logs."))
            .await
            .unwrap();
        store.append(NewMessage::user("earlier")).await.unwrap();

        let client = Arc::new(MockCompletionClient::ready(Ok("ok")));
        let handler = handler(store, client.clone());
        handler.handle(SendMessageCommand::new("now")).await.unwrap();

        let calls = client.calls();
        assert_eq!(
            calls[0].history,
            vec!["earlier".to_string(), "now".to_string()]
        );
    }

    #[tokio::test]
    async fn test_history_window_is_bounded() {
        let store = Arc::new(InMemoryMessageStore::new());
        for i in 0..50 {
            store
                .append(NewMessage::user(format!("m{}", i)))
                .await
                .unwrap();
        }

        let client = Arc::new(MockCompletionClient::ready(Ok("ok")));
        let handler = handler(store, client.clone()).with_window(ConversationWindow::new(40));
        handler.handle(SendMessageCommand::new("last")).await.unwrap();

        let history = &client.calls()[0].history;
        assert_eq!(history.len(), 40);
        assert_eq!(history[0], "m11");
        assert_eq!(history[39], "last");
    }
}
