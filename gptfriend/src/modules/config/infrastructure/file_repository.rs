// File-based Config Repository
//
// 基于 JSON 文件的配置仓储实现

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::modules::config::domain::AppConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// 文件配置仓储
///
/// 配置保存在数据目录下的 `config.json` 中，读取结果缓存在内存
pub struct FileConfigRepository {
    /// 配置文件路径
    config_path: PathBuf,
    /// 内存缓存
    cache: Arc<RwLock<Option<AppConfig>>>,
}

impl FileConfigRepository {
    /// 创建新的文件配置仓储
    ///
    /// # Arguments
    /// * `data_dir` - 应用数据目录
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: data_dir.as_ref().join(CONFIG_FILE_NAME),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 从文件加载配置
    async fn load_from_file(&self) -> Result<Option<AppConfig>, ConfigError> {
        if !tokio::fs::try_exists(&self.config_path).await? {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.config_path).await?;
        let config: AppConfig = serde_json::from_str(&content)?;

        debug!("Loaded config from {:?}", self.config_path);
        Ok(Some(config))
    }

    /// 保存配置到文件
    async fn save_to_file(&self, config: &AppConfig) -> Result<(), ConfigError> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.config_path, content).await?;

        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for FileConfigRepository {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        // 先检查缓存
        {
            let cache = self.cache.read().await;
            if let Some(ref config) = *cache {
                return Ok(config.clone());
            }
        }

        // 从文件加载
        let config = self.load_from_file().await?.unwrap_or_default();

        // 更新缓存
        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(config)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.save_to_file(config).await?;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), ConfigError> {
        // 删除文件
        if tokio::fs::try_exists(&self.config_path).await? {
            tokio::fs::remove_file(&self.config_path).await?;
        }

        // 清除缓存
        {
            let mut cache = self.cache.write().await;
            *cache = None;
        }

        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        Ok(tokio::fs::try_exists(&self.config_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let repo = FileConfigRepository::new(dir.path());

        assert!(!repo.exists().await.unwrap());
        let config = repo.load().await.unwrap();
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();

        {
            let repo = FileConfigRepository::new(dir.path().join("nested"));
            let mut config = AppConfig::default();
            config.notification.enabled = false;
            config.llm.model = "gpt-4o".to_string();
            repo.save(&config).await.unwrap();
            assert!(repo.exists().await.unwrap());
        }

        let repo = FileConfigRepository::new(dir.path().join("nested"));
        let config = repo.load().await.unwrap();
        assert!(!config.notification.enabled);
        assert_eq!(config.llm.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();

        let repo = FileConfigRepository::new(dir.path());
        let result = repo.load().await;

        assert!(matches!(result, Err(ConfigError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let repo = FileConfigRepository::new(dir.path());
        repo.save(&AppConfig::default()).await.unwrap();

        repo.clear().await.unwrap();

        assert!(!repo.exists().await.unwrap());
        assert!(!repo.config_path().exists());
    }
}
