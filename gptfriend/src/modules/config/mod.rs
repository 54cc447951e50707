// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 领域层，包含配置实体和环境变量覆盖
// - ports: 端口层，定义配置读写的抽象接口
// - infrastructure: 基础设施层，实现具体的配置存储适配器
// - application: 应用层，实现 CQRS 命令和查询处理器

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型

// Domain
pub use domain::{
    AppConfig, ChatConfig, EnvOverrides, LLMConfig, NotificationConfig, PartialAppConfig,
    PartialChatConfig, PartialLLMConfig, PartialNotificationConfig, StorageConfig,
    DEFAULT_DATA_DIR, ENV_API_KEY, ENV_BASE_URL, ENV_DATA_DIR, ENV_MODEL,
};

// Ports
pub use ports::{ConfigError, ConfigRepository};

// Infrastructure
pub use infrastructure::{FileConfigRepository, InMemoryConfigRepository, CONFIG_FILE_NAME};

// Application
pub use application::ConfigService;

use std::path::Path;
use std::sync::Arc;

/// Config 模块容器
///
/// 管理模块内的依赖注入
pub struct ConfigModule {
    service: ConfigService,
}

impl ConfigModule {
    /// 使用内存仓储创建（用于测试）
    pub fn new_in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryConfigRepository::new()))
    }

    /// 使用数据目录下的配置文件创建
    pub fn new_with_file(data_dir: impl AsRef<Path>) -> Self {
        Self::with_repository(Arc::new(FileConfigRepository::new(data_dir)))
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            service: ConfigService::new(repository),
        }
    }

    /// 获取配置服务
    pub fn service(&self) -> &ConfigService {
        &self.service
    }

    /// 获取生效配置
    pub async fn effective(&self, env: &EnvOverrides) -> Result<AppConfig, ConfigError> {
        self.service.effective(env).await
    }

    /// 更新配置
    pub async fn update(&self, partial: PartialAppConfig) -> Result<AppConfig, ConfigError> {
        self.service.update(partial).await
    }

    /// 重置配置
    pub async fn reset(&self) -> Result<AppConfig, ConfigError> {
        self.service.reset().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_module_integration() {
        let module = ConfigModule::new_in_memory();

        // 获取默认配置
        let env = EnvOverrides::from_pairs([(ENV_MODEL, "gpt-4o-mini")]);
        let config = module.effective(&env).await.unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");

        // 更新配置
        let updated = module
            .update(PartialAppConfig {
                notification: Some(PartialNotificationConfig {
                    enabled: Some(false),
                    interval_secs: Some(120),
                }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!updated.notification.enabled);
        assert_eq!(updated.notification.interval_secs, 120);
        // 环境变量未写回
        assert_eq!(updated.llm.model, "gpt-3.5-turbo");

        // 重置配置
        let reset = module.reset().await.unwrap();
        assert!(reset.notification.enabled);
    }
}
