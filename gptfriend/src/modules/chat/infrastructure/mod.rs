// Chat Infrastructure Layer
// 基础设施层包含端口的具体实现

pub mod adapters;
pub mod remote_completion_client;
pub mod repositories;

// 重导出常用类型
pub use adapters::llm::{OpenAIAdapter, OpenAIAdapterFactory};
pub use remote_completion_client::RemoteCompletionClient;
pub use repositories::{InMemoryMessageStore, SqliteMessageStore};
