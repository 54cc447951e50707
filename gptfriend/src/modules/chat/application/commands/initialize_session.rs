use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use super::super::notices::init_failure_notice;
use super::super::{ApplicationError, CommandHandler};
use crate::modules::chat::domain::{Message, NewMessage};
use crate::modules::chat::ports::{CompletionClient, InitError, MessageStore};

/// 初始化会话命令
#[derive(Clone)]
pub struct InitializeSessionCommand {
    pub credential: String,
}

impl InitializeSessionCommand {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
        }
    }
}

// 凭据不进入日志
impl std::fmt::Debug for InitializeSessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializeSessionCommand")
            .field("credential", &"***")
            .finish()
    }
}

/// 初始化会话响应
#[derive(Debug, Clone)]
pub struct InitializeSessionResponse {
    /// 初始化失败原因
    pub error: Option<InitError>,
    /// 失败时写入对话的提示消息
    pub notice: Option<Message>,
}

impl InitializeSessionResponse {
    pub fn is_ready(&self) -> bool {
        self.error.is_none()
    }
}

/// 初始化会话命令处理器
pub struct InitializeSessionHandler {
    message_store: Arc<dyn MessageStore>,
    completion_client: Arc<dyn CompletionClient>,
}

impl InitializeSessionHandler {
    pub fn new(
        message_store: Arc<dyn MessageStore>,
        completion_client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            message_store,
            completion_client,
        }
    }
}

#[async_trait]
impl CommandHandler<InitializeSessionCommand, InitializeSessionResponse>
    for InitializeSessionHandler
{
    async fn handle(
        &self,
        command: InitializeSessionCommand,
    ) -> Result<InitializeSessionResponse, ApplicationError> {
        match self.completion_client.initialize(&command.credential).await {
            Ok(()) => {
                info!("Session initialized");
                Ok(InitializeSessionResponse {
                    error: None,
                    notice: None,
                })
            }
            Err(e) => {
                error!("Session initialization failed: {}", e);
                let notice = self
                    .message_store
                    .append(NewMessage::assistant(init_failure_notice(&e)))
                    .await?;
                Ok(InitializeSessionResponse {
                    error: Some(e),
                    notice: Some(notice),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::application::testing::MockCompletionClient;
    use crate::modules::chat::application::MISSING_CREDENTIAL_NOTICE;
    use crate::modules::chat::domain::Sender;
    use crate::modules::chat::infrastructure::InMemoryMessageStore;

    #[tokio::test]
    async fn test_initialize_success_appends_nothing() {
        let store = Arc::new(InMemoryMessageStore::new());
        let client = Arc::new(MockCompletionClient::uninitialized());
        let handler = InitializeSessionHandler::new(store.clone(), client.clone());

        let response = handler
            .handle(InitializeSessionCommand::new("sk-valid"))
            .await
            .unwrap();

        assert!(response.is_ready());
        assert!(response.notice.is_none());
        assert!(client.is_ready());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_notice() {
        let store = Arc::new(InMemoryMessageStore::new());
        let client = Arc::new(MockCompletionClient::failing_init(
            InitError::MissingCredential,
        ));
        let handler = InitializeSessionHandler::new(store.clone(), client);

        let response = handler
            .handle(InitializeSessionCommand::new(""))
            .await
            .unwrap();

        assert_eq!(response.error, Some(InitError::MissingCredential));
        let notice = response.notice.unwrap();
        assert_eq!(notice.text(), MISSING_CREDENTIAL_NOTICE);
        assert_eq!(notice.sender(), Sender::Assistant);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_connection_fault_notice() {
        let store = Arc::new(InMemoryMessageStore::new());
        let client = Arc::new(MockCompletionClient::failing_init(
            InitError::ConnectionFault("tls backend unavailable".to_string()),
        ));
        let handler = InitializeSessionHandler::new(store, client);

        let response = handler
            .handle(InitializeSessionCommand::new("sk-valid"))
            .await
            .unwrap();

        let notice = response.notice.unwrap();
        assert!(notice.text().starts_with("FATAL on init: tls backend unavailable"));
    }

    #[test]
    fn test_command_debug_hides_credential() {
        let command = InitializeSessionCommand::new("sk-secret");
        assert!(!format!("{:?}", command).contains("sk-secret"));
    }
}
