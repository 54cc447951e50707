// Config Commands
//
// 配置相关的命令处理器

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::modules::config::domain::{AppConfig, PartialAppConfig};
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 命令处理器 trait
#[async_trait]
pub trait CommandHandler<C> {
    type Output;
    type Error;

    async fn handle(&self, command: C) -> Result<Self::Output, Self::Error>;
}

// ============================================================================
// Update Config Command
// ============================================================================

/// 更新配置命令
#[derive(Debug, Clone)]
pub struct UpdateConfigCommand {
    pub partial: PartialAppConfig,
}

impl UpdateConfigCommand {
    pub fn new(partial: PartialAppConfig) -> Self {
        Self { partial }
    }
}

/// 更新配置响应
#[derive(Debug, Clone)]
pub struct UpdateConfigResponse {
    pub config: AppConfig,
}

/// 更新配置命令处理器
pub struct UpdateConfigHandler {
    repository: Arc<dyn ConfigRepository>,
}

impl UpdateConfigHandler {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CommandHandler<UpdateConfigCommand> for UpdateConfigHandler {
    type Output = UpdateConfigResponse;
    type Error = ConfigError;

    async fn handle(&self, command: UpdateConfigCommand) -> Result<Self::Output, Self::Error> {
        // 加载当前配置
        let mut config = self.repository.load().await?;

        // 合并更新
        config.merge(command.partial);

        // 验证配置
        config
            .validate()
            .map_err(|errors| ConfigError::ValidationError { errors })?;

        // 保存配置
        self.repository.save(&config).await?;
        info!("Configuration updated");

        Ok(UpdateConfigResponse { config })
    }
}

// ============================================================================
// Reset Config Command
// ============================================================================

/// 重置配置命令
#[derive(Debug, Clone)]
pub struct ResetConfigCommand;

/// 重置配置响应
#[derive(Debug, Clone)]
pub struct ResetConfigResponse {
    pub config: AppConfig,
}

/// 重置配置命令处理器
pub struct ResetConfigHandler {
    repository: Arc<dyn ConfigRepository>,
}

impl ResetConfigHandler {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl CommandHandler<ResetConfigCommand> for ResetConfigHandler {
    type Output = ResetConfigResponse;
    type Error = ConfigError;

    async fn handle(&self, _command: ResetConfigCommand) -> Result<Self::Output, Self::Error> {
        // 清除现有配置
        self.repository.clear().await?;

        // 加载默认配置
        let config = self.repository.load().await?;

        Ok(ResetConfigResponse { config })
    }
}
