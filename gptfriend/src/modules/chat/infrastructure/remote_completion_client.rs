// 远程补全客户端
//
// 管理进程级会话状态，并把一次对话请求转换为单次 HTTP 补全调用

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::modules::chat::domain::{ContextBuilder, Message, DEFAULT_HISTORY_LIMIT};
use crate::modules::chat::ports::{
    CompletionClient, CompletionError, CompletionRequest, InitError, LLMPort, LLMPortFactory,
    LLMProviderConfig,
};

/// 视为未配置的凭据占位值
const PLACEHOLDER_CREDENTIALS: [&str; 2] = ["null", "YOUR_API_KEY"];

/// 会话状态
///
/// 初始化失败后保留错误，进程生命周期内不再重试
enum SessionState {
    Uninitialized,
    Ready(Arc<dyn LLMPort>),
    Failed(InitError),
}

/// 远程补全客户端
pub struct RemoteCompletionClient {
    factory: Arc<dyn LLMPortFactory>,
    config: LLMProviderConfig,
    history_limit: usize,
    state: RwLock<SessionState>,
    /// 进入 Ready 后置位，读取时不受写锁影响
    ready: AtomicBool,
}

impl RemoteCompletionClient {
    /// 创建新的客户端（未初始化）
    pub fn new(factory: Arc<dyn LLMPortFactory>, config: LLMProviderConfig) -> Self {
        Self {
            factory,
            config,
            history_limit: DEFAULT_HISTORY_LIMIT,
            state: RwLock::new(SessionState::Uninitialized),
            ready: AtomicBool::new(false),
        }
    }

    /// 设置单次请求携带的历史消息上限
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// 凭据是否为空或占位值
    pub fn is_placeholder(credential: &str) -> bool {
        let trimmed = credential.trim();
        trimmed.is_empty() || PLACEHOLDER_CREDENTIALS.contains(&trimmed)
    }
}

#[async_trait]
impl CompletionClient for RemoteCompletionClient {
    async fn initialize(&self, credential: &str) -> Result<(), InitError> {
        if self.is_ready() {
            debug!("Completion client already initialized");
            return Ok(());
        }

        let mut state = self.state.write().await;

        match &*state {
            SessionState::Ready(_) => {
                debug!("Completion client already initialized");
                return Ok(());
            }
            SessionState::Failed(err) => {
                warn!("Completion client initialization previously failed, not retrying");
                return Err(err.clone());
            }
            SessionState::Uninitialized => {}
        }

        if Self::is_placeholder(credential) {
            warn!("API key missing or placeholder, completion client stays uninitialized");
            *state = SessionState::Failed(InitError::MissingCredential);
            return Err(InitError::MissingCredential);
        }

        match self.factory.create(&self.config, credential.trim()) {
            Ok(port) => {
                info!(
                    "Completion client ready: base_url={}, model={}",
                    self.config.base_url, self.config.model
                );
                *state = SessionState::Ready(port);
                self.ready.store(true, Ordering::Release);
                Ok(())
            }
            Err(e) => {
                error!("Failed to construct completion client: {}", e);
                let err = InitError::ConnectionFault(e.to_string());
                *state = SessionState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn complete(
        &self,
        user_message: &str,
        history: &[Message],
        system_prompt: &str,
    ) -> Result<String, CompletionError> {
        let port = {
            let state = self.state.read().await;
            match &*state {
                SessionState::Ready(port) => port.clone(),
                _ => return Err(CompletionError::NotReady),
            }
        };

        let messages = ContextBuilder::with_max_messages(self.history_limit)
            .with_system_prompt(system_prompt)
            .build(history, user_message);
        let request = CompletionRequest::new(messages, self.config.model.clone());

        let response = port.complete(request).await.map_err(|e| {
            warn!("Completion request failed: {}", e);
            CompletionError::from(e)
        })?;

        Ok(response.content)
    }
}
