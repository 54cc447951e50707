// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};

use super::environment::{EnvOverrides, ENV_API_KEY, ENV_BASE_URL, ENV_MODEL};
use crate::modules::chat::{DEFAULT_CONTEXT_WINDOW, DEFAULT_HISTORY_LIMIT, DEFAULT_SYSTEM_PROMPT};

/// 请求超时上限（秒）
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// 通知间隔上限（秒），一天
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// LLM 连接配置
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LLMConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 60,
        }
    }
}

impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// 对话配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatConfig {
    /// 发送路径读取的最近消息数
    pub context_window: usize,
    /// 单次补全请求携带的历史上限
    pub history_limit: usize,
    pub system_prompt: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            history_limit: DEFAULT_HISTORY_LIMIT,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// 数据目录下的数据库文件名
    pub database_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: "gpt-friend.db".to_string(),
        }
    }
}

/// 定时通知配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub fallback_message: String,
    /// 通知文本最大字符数
    pub max_length: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
            fallback_message: "i miss you </3".to_string(),
            max_length: 100,
        }
    }
}

/// 应用配置聚合根
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub llm: LLMConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
}

impl AppConfig {
    /// 创建新的默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并部分配置更新
    pub fn merge(&mut self, partial: PartialAppConfig) {
        if let Some(llm) = partial.llm {
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(chat) = partial.chat {
            if let Some(context_window) = chat.context_window {
                self.chat.context_window = context_window;
            }
            if let Some(history_limit) = chat.history_limit {
                self.chat.history_limit = history_limit;
            }
            if let Some(system_prompt) = chat.system_prompt {
                self.chat.system_prompt = system_prompt;
            }
        }

        if let Some(notification) = partial.notification {
            if let Some(enabled) = notification.enabled {
                self.notification.enabled = enabled;
            }
            if let Some(interval_secs) = notification.interval_secs {
                self.notification.interval_secs = interval_secs;
            }
        }
    }

    /// 用环境变量覆盖配置（凭据通常只通过环境提供）
    pub fn apply_env(&mut self, env: &EnvOverrides) {
        if let Some(api_key) = env.get(ENV_API_KEY) {
            self.llm.api_key = api_key.to_string();
        }
        if let Some(base_url) = env.get(ENV_BASE_URL) {
            self.llm.base_url = base_url.to_string();
        }
        if let Some(model) = env.get(ENV_MODEL) {
            self.llm.model = model.to_string();
        }
    }

    /// 验证配置是否有效
    ///
    /// 时长字段有上限，避免计时器在运行时溢出
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.llm.base_url.trim().is_empty() {
            errors.push("LLM base URL must not be empty".to_string());
        }
        if self.llm.model.trim().is_empty() {
            errors.push("LLM model must not be empty".to_string());
        }
        if self.llm.timeout_secs == 0 {
            errors.push("LLM timeout must be positive".to_string());
        } else if self.llm.timeout_secs > MAX_TIMEOUT_SECS {
            errors.push(format!("LLM timeout must not exceed {}s", MAX_TIMEOUT_SECS));
        }

        if self.chat.context_window == 0 {
            errors.push("Context window must be positive".to_string());
        }
        if self.chat.history_limit == 0 {
            errors.push("History limit must be positive".to_string());
        }

        if self.storage.database_file.trim().is_empty() {
            errors.push("Database file name must not be empty".to_string());
        }

        if self.notification.interval_secs == 0 {
            errors.push("Notification interval must be positive".to_string());
        } else if self.notification.interval_secs > MAX_INTERVAL_SECS {
            errors.push(format!(
                "Notification interval must not exceed {}s",
                MAX_INTERVAL_SECS
            ));
        }
        if self.notification.max_length == 0 {
            errors.push("Notification max length must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// 部分配置更新（用于合并）
///
/// 凭据与存储位置不接受运行时更新
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialAppConfig {
    pub llm: Option<PartialLLMConfig>,
    pub chat: Option<PartialChatConfig>,
    pub notification: Option<PartialNotificationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialLLMConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialChatConfig {
    pub context_window: Option<usize>,
    pub history_limit: Option<usize>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartialNotificationConfig {
    pub enabled: Option<bool>,
    pub interval_secs: Option<u64>,
}
