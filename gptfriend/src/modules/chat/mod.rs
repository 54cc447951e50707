// Chat Module - 聊天模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含实体、值对象和领域服务
// - ports: 端口层，定义与外部世界的抽象接口
// - infrastructure: 基础设施层，实现端口的具体适配器
// - application: 应用层，实现 CQRS 命令和查询处理器

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    // Traits
    ApplicationError,
    // Commands
    ClearConversationCommand,
    ClearConversationHandler,
    ClearConversationResponse,
    CommandHandler,
    InitializeSessionCommand,
    InitializeSessionHandler,
    InitializeSessionResponse,
    // Queries
    ListMessagesHandler,
    ListMessagesQuery,
    ListMessagesResponse,
    QueryHandler,
    SendMessageCommand,
    SendMessageHandler,
    SendMessageResponse,
    SendOutcome,
    MISSING_CREDENTIAL_NOTICE,
    NOT_INITIALIZED_NOTICE,
};

pub use domain::{
    ContextBuilder, ConversationWindow, Message, MessageId, NewMessage, Sender, TranscriptCursor,
    TranscriptUpdate, DEFAULT_CONTEXT_WINDOW, DEFAULT_HISTORY_LIMIT, DEFAULT_SYSTEM_PROMPT,
};

pub use infrastructure::{
    InMemoryMessageStore, OpenAIAdapter, OpenAIAdapterFactory, RemoteCompletionClient,
    SqliteMessageStore,
};

pub use ports::{
    CompletionClient, CompletionError, CompletionRequest, CompletionResponse, FinishReason,
    InitError, LLMError, LLMPort, LLMPortFactory, LLMProviderConfig, MessageStore, MessageStream,
    StoreError, TokenUsage,
};

use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 对话编排参数
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// 发送路径读取的最近消息数
    pub context_window: usize,
    /// 单次补全请求携带的历史上限
    pub history_limit: usize,
    pub system_prompt: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            history_limit: DEFAULT_HISTORY_LIMIT,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Chat 模块容器
///
/// 管理模块内的依赖注入，也是对话编排的唯一入口：
/// 只有这里会写入消息存储、调用补全客户端
pub struct ChatModule {
    message_store: Arc<dyn MessageStore>,
    completion_client: Arc<dyn CompletionClient>,
    // 按提交顺序串行处理写操作
    write_lock: Mutex<()>,
    // Handlers
    send_message_handler: SendMessageHandler,
    clear_conversation_handler: ClearConversationHandler,
    initialize_session_handler: InitializeSessionHandler,
    list_messages_handler: ListMessagesHandler,
}

impl ChatModule {
    /// 创建新的 ChatModule 实例（内存存储，用于开发测试）
    pub fn new(provider: LLMProviderConfig, settings: ChatSettings) -> Self {
        let message_store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
        let completion_client = Self::remote_client(provider, &settings);

        Self::with_components(message_store, completion_client, settings)
    }

    /// 创建带持久化存储的 ChatModule 实例（生产环境推荐）
    ///
    /// # Errors
    /// 如果无法打开数据库，返回错误
    pub async fn new_with_persistence(
        database_path: impl AsRef<Path>,
        provider: LLMProviderConfig,
        settings: ChatSettings,
    ) -> Result<Self, StoreError> {
        let message_store: Arc<dyn MessageStore> =
            Arc::new(SqliteMessageStore::open(database_path).await?);
        let completion_client = Self::remote_client(provider, &settings);

        Ok(Self::with_components(
            message_store,
            completion_client,
            settings,
        ))
    }

    /// 使用自定义存储和客户端创建 ChatModule
    pub fn with_components(
        message_store: Arc<dyn MessageStore>,
        completion_client: Arc<dyn CompletionClient>,
        settings: ChatSettings,
    ) -> Self {
        let send_message_handler =
            SendMessageHandler::new(message_store.clone(), completion_client.clone())
                .with_window(ConversationWindow::new(settings.context_window))
                .with_system_prompt(settings.system_prompt);
        let clear_conversation_handler = ClearConversationHandler::new(message_store.clone());
        let initialize_session_handler =
            InitializeSessionHandler::new(message_store.clone(), completion_client.clone());
        let list_messages_handler = ListMessagesHandler::new(message_store.clone());

        Self {
            message_store,
            completion_client,
            write_lock: Mutex::new(()),
            send_message_handler,
            clear_conversation_handler,
            initialize_session_handler,
            list_messages_handler,
        }
    }

    fn remote_client(
        provider: LLMProviderConfig,
        settings: &ChatSettings,
    ) -> Arc<dyn CompletionClient> {
        Arc::new(
            RemoteCompletionClient::new(Arc::new(OpenAIAdapterFactory), provider)
                .with_history_limit(settings.history_limit),
        )
    }

    // Command handlers

    /// 发送用户消息
    ///
    /// 空白输入返回 `ApplicationError::Validation`，不写入存储
    pub async fn send_user_message(
        &self,
        text: impl Into<String>,
    ) -> Result<SendMessageResponse, ApplicationError> {
        let _guard = self.write_lock.lock().await;
        self.send_message_handler
            .handle(SendMessageCommand::new(text))
            .await
    }

    /// 清空对话（不影响会话状态）
    pub async fn clear_conversation(&self) -> Result<ClearConversationResponse, ApplicationError> {
        let _guard = self.write_lock.lock().await;
        self.clear_conversation_handler
            .handle(ClearConversationCommand)
            .await
    }

    /// 初始化补全会话，失败时写入一条提示消息
    pub async fn initialize_session(
        &self,
        credential: impl Into<String>,
    ) -> Result<InitializeSessionResponse, ApplicationError> {
        let _guard = self.write_lock.lock().await;
        self.initialize_session_handler
            .handle(InitializeSessionCommand::new(credential))
            .await
    }

    // Query handlers

    /// 列出消息
    pub async fn list_messages(
        &self,
        query: ListMessagesQuery,
    ) -> Result<ListMessagesResponse, ApplicationError> {
        self.list_messages_handler.handle(query).await
    }

    /// 全部消息快照
    pub async fn messages(&self) -> Result<Vec<Message>, ApplicationError> {
        Ok(self.list_messages(ListMessagesQuery::all()).await?.messages)
    }

    /// 订阅消息序列的实时视图
    pub fn watch_messages(&self) -> MessageStream {
        self.message_store.watch()
    }

    pub fn session_ready(&self) -> bool {
        self.completion_client.is_ready()
    }

    // Accessors

    /// 获取消息存储
    pub fn message_store(&self) -> &Arc<dyn MessageStore> {
        &self.message_store
    }

    /// 获取补全客户端
    pub fn completion_client(&self) -> &Arc<dyn CompletionClient> {
        &self.completion_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::application::testing::MockCompletionClient;
    use futures::StreamExt;

    fn module_with(client: MockCompletionClient) -> (ChatModule, Arc<MockCompletionClient>) {
        let client = Arc::new(client);
        let module = ChatModule::with_components(
            Arc::new(InMemoryMessageStore::new()),
            client.clone(),
            ChatSettings::default(),
        );
        (module, client)
    }

    #[tokio::test]
    async fn test_missing_credential_scenario() {
        let module = ChatModule::new(LLMProviderConfig::default(), ChatSettings::default());

        let init = module.initialize_session("").await.unwrap();
        assert_eq!(init.error, Some(InitError::MissingCredential));
        assert!(!module.session_ready());

        let response = module.send_user_message("hi").await.unwrap();
        assert_eq!(response.outcome, SendOutcome::NotReady);

        let messages = module.messages().await.unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text(), MISSING_CREDENTIAL_NOTICE);
        assert_eq!(messages[0].sender(), Sender::Assistant);
        assert_eq!(messages[1].text(), "hi");
        assert_eq!(messages[1].sender(), Sender::User);
        assert_eq!(messages[2].text(), NOT_INITIALIZED_NOTICE);
        assert_eq!(messages[2].sender(), Sender::Assistant);
    }

    #[tokio::test]
    async fn test_clear_keeps_session_state() {
        let (module, client) = module_with(MockCompletionClient::ready(Ok("sup")));

        module.send_user_message("hey").await.unwrap();
        module.clear_conversation().await.unwrap();

        assert!(module.messages().await.unwrap().is_empty());
        assert!(module.session_ready());

        module.send_user_message("again").await.unwrap();
        assert_eq!(client.calls().len(), 2);
        assert_eq!(client.calls()[1].history, vec!["again".to_string()]);
    }

    #[tokio::test]
    async fn test_custom_system_prompt() {
        let client = Arc::new(MockCompletionClient::ready(Ok("ok")));
        let settings = ChatSettings {
            system_prompt: "be brief".to_string(),
            ..ChatSettings::default()
        };
        let module = ChatModule::with_components(
            Arc::new(InMemoryMessageStore::new()),
            client.clone(),
            settings,
        );

        module.send_user_message("hello").await.unwrap();
        assert_eq!(client.calls()[0].system_prompt, "be brief");
    }

    #[tokio::test]
    async fn test_concurrent_sends_pair_up() {
        let (module, _client) = module_with(MockCompletionClient::ready(Ok("ok")));
        let module = Arc::new(module);

        let mut tasks = Vec::new();
        for i in 0..8 {
            let module = module.clone();
            tasks.push(tokio::spawn(async move {
                module.send_user_message(format!("msg {}", i)).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let messages = module.messages().await.unwrap();
        assert_eq!(messages.len(), 16);
        // 每条用户消息后紧跟对应的助手回复
        for pair in messages.chunks(2) {
            assert!(pair[0].is_user());
            assert!(!pair[1].is_user());
        }
        for window in messages.windows(2) {
            assert!(window[0].id().value() < window[1].id().value());
        }
    }

    #[tokio::test]
    async fn test_watch_messages_follows_sends() {
        let (module, _client) = module_with(MockCompletionClient::ready(Ok("sup")));
        let mut stream = module.watch_messages();

        assert!(stream.next().await.unwrap().is_empty());

        module.send_user_message("hey").await.unwrap();
        let mut latest = stream.next().await.unwrap();
        while latest.len() < 2 {
            latest = stream.next().await.unwrap();
        }
        assert_eq!(latest[0].text(), "hey");
        assert_eq!(latest[1].text(), "sup");

        module.clear_conversation().await.unwrap();
        let mut latest = stream.next().await.unwrap();
        while !latest.is_empty() {
            latest = stream.next().await.unwrap();
        }
        assert!(latest.is_empty());
    }

    #[tokio::test]
    async fn test_blank_send_is_rejected() {
        let (module, client) = module_with(MockCompletionClient::ready(Ok("ok")));

        let result = module.send_user_message("   ").await;
        assert!(matches!(result, Err(ApplicationError::Validation(_))));
        assert!(module.messages().await.unwrap().is_empty());
        assert!(client.calls().is_empty());
    }
}
