use std::sync::Arc;
use tracing::{debug, warn};

use crate::modules::chat::ports::{CompletionClient, MessageStore};
use crate::modules::notification::domain::{
    language_detection_request, miss_you_system_prompt, truncate_chars, DEFAULT_LANGUAGE,
    LANGUAGE_DETECTION_SYSTEM_PROMPT, LANGUAGE_SAMPLE_SIZE, MISS_YOU_REQUEST,
};

/// "想你了"消息生成器
///
/// 与对话共享补全客户端，但不写入消息存储；任何失败都回退到固定文本
pub struct MissYouGenerator {
    completion_client: Arc<dyn CompletionClient>,
    message_store: Arc<dyn MessageStore>,
    fallback_message: String,
    max_length: usize,
}

impl MissYouGenerator {
    pub fn new(
        completion_client: Arc<dyn CompletionClient>,
        message_store: Arc<dyn MessageStore>,
        fallback_message: impl Into<String>,
        max_length: usize,
    ) -> Self {
        Self {
            completion_client,
            message_store,
            fallback_message: fallback_message.into(),
            max_length,
        }
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// 根据最近的对话判断语言
    pub async fn detect_language(&self) -> String {
        let recent = match self.message_store.recent(LANGUAGE_SAMPLE_SIZE).await {
            Ok(recent) => recent,
            Err(e) => {
                warn!("Failed to read history for language detection: {}", e);
                return DEFAULT_LANGUAGE.to_string();
            }
        };

        if recent.is_empty() {
            return DEFAULT_LANGUAGE.to_string();
        }

        let request = language_detection_request(&recent);
        match self
            .completion_client
            .complete(&request, &[], LANGUAGE_DETECTION_SYSTEM_PROMPT)
            .await
        {
            Ok(language) if !language.trim().is_empty() => language.trim().to_string(),
            Ok(_) => DEFAULT_LANGUAGE.to_string(),
            Err(e) => {
                warn!("Language detection failed: {}", e);
                DEFAULT_LANGUAGE.to_string()
            }
        }
    }

    /// 生成一条通知文本
    pub async fn generate(&self) -> String {
        if !self.completion_client.is_ready() {
            debug!("Completion client not ready, using fallback notification");
            return self.fallback_message.clone();
        }

        let language = self.detect_language().await;
        let system_prompt = miss_you_system_prompt(&language);

        match self
            .completion_client
            .complete(MISS_YOU_REQUEST, &[], &system_prompt)
            .await
        {
            Ok(text) if !text.trim().is_empty() => truncate_chars(text.trim(), self.max_length),
            Ok(_) => self.fallback_message.clone(),
            Err(e) => {
                warn!("Failed to generate notification: {}", e);
                self.fallback_message.clone()
            }
        }
    }
}
