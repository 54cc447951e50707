pub mod infrastructure;
pub mod modules;
pub mod shared;

use std::path::Path;
use std::sync::Arc;

use infrastructure::{AppEvent, EventBus};
use modules::chat::{ChatSettings, InitializeSessionResponse, LLMProviderConfig};
use modules::config::{AppConfig, EnvOverrides, PartialAppConfig, PartialNotificationConfig};
use modules::{ChatModule, ConfigModule, NotificationModule};
use shared::AppResult;

/// 应用容器
///
/// 组装各模块，向展示层提供对话、清空和通知开关
pub struct GptFriend {
    config: AppConfig,
    config_module: ConfigModule,
    chat: Arc<ChatModule>,
    notifications: NotificationModule,
    event_bus: Arc<EventBus>,
}

impl GptFriend {
    /// 从环境变量和数据目录中的配置启动
    pub async fn bootstrap(env: &EnvOverrides) -> AppResult<Self> {
        let data_dir = env.data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;
        tracing::info!("Data directory: {:?}", data_dir);

        let config_module = ConfigModule::new_with_file(&data_dir);
        let config = config_module.effective(env).await?;

        Ok(Self::assemble(config_module, config, &data_dir).await)
    }

    /// 使用给定配置组装各模块
    ///
    /// 数据库打不开时退回内存存储
    pub async fn assemble(config_module: ConfigModule, config: AppConfig, data_dir: &Path) -> Self {
        let provider = provider_config(&config);
        let settings = chat_settings(&config);
        let database_path = data_dir.join(&config.storage.database_file);

        let chat = match ChatModule::new_with_persistence(
            &database_path,
            provider.clone(),
            settings.clone(),
        )
        .await
        {
            Ok(module) => {
                tracing::info!("Chat module initialized with persistent storage");
                Arc::new(module)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize persistent storage: {}, falling back to memory",
                    e
                );
                Arc::new(ChatModule::new(provider, settings))
            }
        };

        let event_bus = Arc::new(EventBus::new());
        let notifications = NotificationModule::new(&chat, event_bus.clone(), &config.notification);

        Self {
            config,
            config_module,
            chat,
            notifications,
            event_bus,
        }
    }

    /// 初始化补全会话，并按配置启动定时通知
    pub async fn start(&self) -> AppResult<InitializeSessionResponse> {
        tracing::info!("GPTFriend starting...");

        let response = self
            .chat
            .initialize_session(self.config.llm.api_key.clone())
            .await?;

        if let Some(notice) = &response.notice {
            self.event_bus
                .publish(AppEvent::SessionFailed(notice.text().to_string()));
        }

        if self.config.notification.enabled {
            self.notifications.set_enabled(true);
        }

        Ok(response)
    }

    /// 清空对话
    pub async fn clear_conversation(&self) -> AppResult<usize> {
        let response = self.chat.clear_conversation().await?;
        self.event_bus.publish(AppEvent::ConversationCleared);
        Ok(response.removed)
    }

    /// 开关定时通知并保存设置
    pub async fn set_notifications(&self, enabled: bool) -> AppResult<()> {
        self.config_module
            .update(PartialAppConfig {
                notification: Some(PartialNotificationConfig {
                    enabled: Some(enabled),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await?;

        self.notifications.set_enabled(enabled);
        Ok(())
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications.is_enabled()
    }

    pub fn chat(&self) -> &Arc<ChatModule> {
        &self.chat
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn provider_config(config: &AppConfig) -> LLMProviderConfig {
    LLMProviderConfig {
        base_url: config.llm.base_url.clone(),
        model: config.llm.model.clone(),
        timeout_secs: config.llm.timeout_secs,
    }
}

fn chat_settings(config: &AppConfig) -> ChatSettings {
    ChatSettings {
        context_window: config.chat.context_window,
        history_limit: config.chat.history_limit,
        system_prompt: config.chat.system_prompt.clone(),
    }
}
