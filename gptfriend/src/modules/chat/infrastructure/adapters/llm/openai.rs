use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::modules::chat::ports::{
    CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMPort, LLMPortFactory,
    LLMProviderConfig, TokenUsage,
};

/// OpenAI API 适配器
pub struct OpenAIAdapter {
    client: Client,
    config: LLMProviderConfig,
    api_key: String,
}

impl OpenAIAdapter {
    /// 创建新的 OpenAI 适配器
    pub fn new(config: LLMProviderConfig, api_key: impl Into<String>) -> Result<Self, LLMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// 获取 API URL
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// 转换为 OpenAI 请求格式
    fn to_openai_request(request: &CompletionRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role.clone(),
                    content: Some(m.content.clone()),
                })
                .collect(),
        }
    }

    /// 将传输层错误映射为 LLMError
    fn map_transport_error(&self, err: reqwest::Error) -> LLMError {
        if err.is_timeout() {
            LLMError::Timeout(self.config.timeout_secs)
        } else {
            LLMError::NetworkError(err.to_string())
        }
    }

    /// 将非 2xx 状态映射为 LLMError
    fn map_status_error(status: StatusCode, body: String) -> LLMError {
        match status.as_u16() {
            401 => LLMError::AuthenticationError("Invalid API key".to_string()),
            429 => LLMError::RateLimitError {
                retry_after_secs: 60,
            },
            _ => LLMError::ApiError {
                code: status.to_string(),
                message: body,
            },
        }
    }

    /// 取第一个选项的文本
    fn into_completion(response: OpenAIResponse) -> Result<CompletionResponse, LLMError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LLMError::EmptyResponse)?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LLMError::EmptyResponse)?;

        Ok(CompletionResponse {
            content,
            finish_reason: FinishReason::parse(choice.finish_reason.as_deref()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

#[async_trait]
impl LLMPort for OpenAIAdapter {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError> {
        let openai_request = Self::to_openai_request(&request);

        debug!(
            "Sending OpenAI completion request: model={}, messages={}",
            openai_request.model,
            openai_request.messages.len()
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error: {} - {}", status, error_text);
            return Err(Self::map_status_error(status, error_text));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;

        let completion = Self::into_completion(openai_response)?;
        debug!(
            "OpenAI completion finished: reason={:?}, usage={:?}",
            completion.finish_reason, completion.usage
        );

        Ok(completion)
    }
}

/// OpenAI 适配器工厂
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAIAdapterFactory;

impl LLMPortFactory for OpenAIAdapterFactory {
    fn create(
        &self,
        config: &LLMProviderConfig,
        api_key: &str,
    ) -> Result<Arc<dyn LLMPort>, LLMError> {
        Ok(Arc::new(OpenAIAdapter::new(config.clone(), api_key)?))
    }
}

// OpenAI API 类型定义

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
