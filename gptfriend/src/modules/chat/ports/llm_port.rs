use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::super::domain::ChatMessage;

/// LLM 错误类型
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("API error: {code} - {message}")]
    ApiError { code: String, message: String },

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitError { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No content in response")]
    EmptyResponse,
}

/// 补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// 有序的消息列表
    pub messages: Vec<ChatMessage>,
    /// 模型 ID
    pub model: String,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, model: impl Into<String>) -> Self {
        Self {
            messages,
            model: model.into(),
        }
    }
}

/// 补全响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub content: String,
    pub finish_reason: FinishReason,
    pub usage: Option<TokenUsage>,
}

/// 结束原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("stop") | None => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        }
    }
}

/// Token 使用统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// LLM 服务端口
///
/// HTTP 适配器实现此 trait；单次请求、单次响应，不做重试
#[async_trait]
pub trait LLMPort: Send + Sync {
    /// 单次补全请求
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError>;
}

/// LLM 端口工厂 trait
///
/// 会话初始化时用凭据创建适配器实例
pub trait LLMPortFactory: Send + Sync {
    /// 创建适配器实例
    fn create(&self, config: &LLMProviderConfig, api_key: &str)
        -> Result<Arc<dyn LLMPort>, LLMError>;
}

/// LLM 提供商配置（凭据单独传入）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LLMProviderConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LLMProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_parse() {
        assert_eq!(FinishReason::parse(Some("stop")), FinishReason::Stop);
        assert_eq!(FinishReason::parse(None), FinishReason::Stop);
        assert_eq!(FinishReason::parse(Some("length")), FinishReason::Length);
        assert_eq!(FinishReason::parse(Some("tool_calls")), FinishReason::Other);
    }

    #[test]
    fn test_default_provider_config() {
        let config = LLMProviderConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.timeout_secs, 60);
    }
}
