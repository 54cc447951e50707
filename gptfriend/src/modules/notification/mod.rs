// Notification Module
//
// 定时"想你了"通知：
// - domain: 提示词与文本处理
// - application: 通知文本生成
// - infrastructure: 基于 tokio 的定时调度

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::MissYouGenerator;
pub use infrastructure::NotificationScheduler;

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::EventBus;
use crate::modules::chat::ChatModule;
use crate::modules::config::NotificationConfig;

/// Notification 模块容器
pub struct NotificationModule {
    scheduler: NotificationScheduler,
}

impl NotificationModule {
    /// 基于对话模块的存储和补全客户端创建
    pub fn new(chat: &ChatModule, event_bus: Arc<EventBus>, config: &NotificationConfig) -> Self {
        let generator = Arc::new(MissYouGenerator::new(
            chat.completion_client().clone(),
            chat.message_store().clone(),
            config.fallback_message.clone(),
            config.max_length,
        ));

        Self {
            scheduler: NotificationScheduler::new(
                generator,
                event_bus,
                Duration::from_secs(config.interval_secs),
            ),
        }
    }

    pub fn scheduler(&self) -> &NotificationScheduler {
        &self.scheduler
    }

    /// 开关通知
    pub fn set_enabled(&self, enabled: bool) {
        if enabled {
            self.scheduler.schedule();
        } else {
            self.scheduler.cancel();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.scheduler.is_scheduled()
    }
}
