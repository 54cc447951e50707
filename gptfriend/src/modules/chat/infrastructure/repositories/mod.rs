// 消息存储实现

mod in_memory_message_store;
mod message_feed;
mod sqlite_message_store;

pub use in_memory_message_store::*;
pub use sqlite_message_store::*;
