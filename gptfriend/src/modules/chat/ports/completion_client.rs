use async_trait::async_trait;
use thiserror::Error;

use super::llm_port::LLMError;
use crate::modules::chat::domain::Message;

/// 会话初始化错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// 凭据为空或为占位值
    #[error("API key not configured properly")]
    MissingCredential,

    /// 底层客户端构建失败
    #[error("{0}")]
    ConnectionFault(String),
}

/// 补全错误
///
/// `Display` 输出即展示给用户的错误描述
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("OpenAI client is not initialized")]
    NotReady,

    #[error("No response from ChatGPT")]
    EmptyResponse,

    #[error("{0}")]
    TransportOrApiError(String),
}

impl From<LLMError> for CompletionError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::EmptyResponse => CompletionError::EmptyResponse,
            other => CompletionError::TransportOrApiError(other.to_string()),
        }
    }
}

/// 远程补全客户端端口
///
/// 会话状态只有两种：未初始化 / 就绪
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 使用凭据初始化会话
    async fn initialize(&self, credential: &str) -> Result<(), InitError>;

    /// 会话是否就绪（无副作用）
    fn is_ready(&self) -> bool;

    /// 根据用户消息、历史和系统提示获取一次回复
    async fn complete(
        &self,
        user_message: &str,
        history: &[Message],
        system_prompt: &str,
    ) -> Result<String, CompletionError>;
}
