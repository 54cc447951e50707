use serde::{Deserialize, Serialize};

use super::super::entities::Message;

/// 远程补全请求中历史消息的默认上限
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// 上下文构建器
///
/// 领域服务：构建发送给 LLM 的有序提示（消息历史）
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    /// 最大历史消息数
    max_messages: usize,
    /// 系统提示词
    system_prompt: Option<String>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    /// 创建上下文构建器（默认最多 20 条历史消息）
    pub fn new() -> Self {
        Self::with_max_messages(DEFAULT_HISTORY_LIMIT)
    }

    /// 创建指定最大消息数的上下文构建器
    pub fn with_max_messages(max_messages: usize) -> Self {
        Self {
            max_messages,
            system_prompt: None,
        }
    }

    /// 设置系统提示词
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// 构建上下文消息列表
    ///
    /// 返回顺序：
    /// 1. 系统提示词（如果有）
    /// 2. 最近的 N 条历史消息，按发送方标注角色
    /// 3. 当前用户消息
    pub fn build(&self, history: &[Message], user_message: &str) -> Vec<ChatMessage> {
        let start = history.len().saturating_sub(self.max_messages);
        let mut context = Vec::with_capacity(history.len() - start + 2);

        if let Some(ref prompt) = self.system_prompt {
            context.push(ChatMessage::system(prompt.clone()));
        }

        for msg in &history[start..] {
            context.push(ChatMessage {
                role: msg.sender().to_openai_role().to_string(),
                content: msg.text().to_string(),
            });
        }

        context.push(ChatMessage::user(user_message));

        context
    }
}

/// LLM 请求消息格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
