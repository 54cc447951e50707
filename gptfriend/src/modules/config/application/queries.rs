// Config Queries
//
// 配置相关的查询处理器

use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 查询处理器 trait
#[async_trait]
pub trait QueryHandler<Q> {
    type Output;
    type Error;

    async fn handle(&self, query: Q) -> Result<Self::Output, Self::Error>;
}

// ============================================================================
// Get All Config Query
// ============================================================================

/// 获取全部配置查询
#[derive(Debug, Clone, Default)]
pub struct GetAllConfigQuery;

/// 获取全部配置响应
#[derive(Debug, Clone)]
pub struct GetAllConfigResponse {
    pub config: AppConfig,
}

/// 获取全部配置查询处理器
pub struct GetAllConfigHandler {
    repository: Arc<dyn ConfigRepository>,
}

impl GetAllConfigHandler {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<GetAllConfigQuery> for GetAllConfigHandler {
    type Output = GetAllConfigResponse;
    type Error = ConfigError;

    async fn handle(&self, _query: GetAllConfigQuery) -> Result<Self::Output, Self::Error> {
        let config = self.repository.load().await?;
        Ok(GetAllConfigResponse { config })
    }
}

// ============================================================================
// Check Config Exists Query
// ============================================================================

/// 检查配置文件是否存在查询
#[derive(Debug, Clone, Default)]
pub struct ConfigExistsQuery;

/// 检查配置是否存在响应
#[derive(Debug, Clone)]
pub struct ConfigExistsResponse {
    pub exists: bool,
}

/// 检查配置是否存在查询处理器
pub struct ConfigExistsHandler {
    repository: Arc<dyn ConfigRepository>,
}

impl ConfigExistsHandler {
    pub fn new(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl QueryHandler<ConfigExistsQuery> for ConfigExistsHandler {
    type Output = ConfigExistsResponse;
    type Error = ConfigError;

    async fn handle(&self, _query: ConfigExistsQuery) -> Result<Self::Output, Self::Error> {
        let exists = self.repository.exists().await?;
        Ok(ConfigExistsResponse { exists })
    }
}
