// 环境变量覆盖

use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "GPTFRIEND_MODEL";
pub const ENV_DATA_DIR: &str = "GPTFRIEND_DATA_DIR";

/// 未设置数据目录时使用的默认位置
pub const DEFAULT_DATA_DIR: &str = ".gptfriend";

const KNOWN_VARIABLES: [&str; 4] = [ENV_API_KEY, ENV_BASE_URL, ENV_MODEL, ENV_DATA_DIR];

/// 环境变量快照
///
/// 只保留非空白的已知变量
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    values: HashMap<String, String>,
}

impl EnvOverrides {
    /// 读取当前进程环境
    pub fn from_process() -> Self {
        Self::from_pairs(
            KNOWN_VARIABLES
                .iter()
                .filter_map(|name| std::env::var(name).ok().map(|value| (*name, value))),
        )
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.trim())
    }

    /// 数据目录
    pub fn data_dir(&self) -> PathBuf {
        self.get(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}
