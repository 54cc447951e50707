// Config Service
//
// 配置服务门面，提供统一的 API

use std::sync::Arc;
use tracing::debug;

use super::{
    CommandHandler, ConfigExistsHandler, ConfigExistsQuery, GetAllConfigHandler,
    GetAllConfigQuery, QueryHandler, ResetConfigCommand, ResetConfigHandler, UpdateConfigCommand,
    UpdateConfigHandler,
};
use crate::modules::config::domain::{AppConfig, EnvOverrides, PartialAppConfig};
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 配置服务实现
pub struct ConfigService {
    repository: Arc<dyn ConfigRepository>,
    // Handlers
    get_all_handler: GetAllConfigHandler,
    exists_handler: ConfigExistsHandler,
    update_handler: UpdateConfigHandler,
    reset_handler: ResetConfigHandler,
}

impl ConfigService {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            get_all_handler: GetAllConfigHandler::new(repository.clone()),
            exists_handler: ConfigExistsHandler::new(repository.clone()),
            update_handler: UpdateConfigHandler::new(repository.clone()),
            reset_handler: ResetConfigHandler::new(repository.clone()),
            repository,
        }
    }

    /// 获取仓储引用
    pub fn repository(&self) -> &Arc<dyn ConfigRepository> {
        &self.repository
    }

    /// 获取已保存的配置
    pub async fn get_all(&self) -> Result<AppConfig, ConfigError> {
        let response = self.get_all_handler.handle(GetAllConfigQuery).await?;
        Ok(response.config)
    }

    /// 获取生效配置：已保存的配置叠加环境变量
    ///
    /// 环境变量只作用于返回值，不写回存储
    pub async fn effective(&self, env: &EnvOverrides) -> Result<AppConfig, ConfigError> {
        let mut config = self.get_all().await?;
        config.apply_env(env);
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;

        debug!("Effective config: {:?}", config);
        Ok(config)
    }

    /// 更新部分配置
    pub async fn update(&self, partial: PartialAppConfig) -> Result<AppConfig, ConfigError> {
        let response = self
            .update_handler
            .handle(UpdateConfigCommand::new(partial))
            .await?;
        Ok(response.config)
    }

    /// 重置为默认配置
    pub async fn reset(&self) -> Result<AppConfig, ConfigError> {
        let response = self.reset_handler.handle(ResetConfigCommand).await?;
        Ok(response.config)
    }

    /// 配置是否已持久化
    pub async fn exists(&self) -> Result<bool, ConfigError> {
        let response = self.exists_handler.handle(ConfigExistsQuery).await?;
        Ok(response.exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::config::domain::{PartialNotificationConfig, ENV_API_KEY};
    use crate::modules::config::infrastructure::{FileConfigRepository, InMemoryConfigRepository};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_service() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let service = ConfigService::new(repo);

        let config = service.get_all().await.unwrap();
        assert!(config.notification.enabled);

        let updated = service
            .update(PartialAppConfig {
                notification: Some(PartialNotificationConfig {
                    enabled: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!updated.notification.enabled);

        let reset = service.reset().await.unwrap();
        assert!(reset.notification.enabled);
    }

    #[tokio::test]
    async fn test_env_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(Arc::new(FileConfigRepository::new(dir.path())));
        let env = EnvOverrides::from_pairs([(ENV_API_KEY, "sk-env")]);

        let effective = service.effective(&env).await.unwrap();
        assert_eq!(effective.llm.api_key, "sk-env");

        service.update(PartialAppConfig::default()).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
        assert!(!content.contains("sk-env"));
        assert!(service.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_stored_config_is_rejected() {
        let mut config = AppConfig::default();
        config.notification.interval_secs = 0;
        let service = ConfigService::new(Arc::new(InMemoryConfigRepository::with_config(config)));

        let result = service.effective(&EnvOverrides::default()).await;
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_oversized_interval_in_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"notification":{"intervalSecs":18446744073709551615}}"#,
        )
        .unwrap();
        let service = ConfigService::new(Arc::new(FileConfigRepository::new(dir.path())));

        match service.effective(&EnvOverrides::default()).await {
            Err(ConfigError::ValidationError { errors }) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("interval"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }
}
