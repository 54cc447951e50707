// Chat Domain Layer
// 领域层包含业务实体、值对象和领域服务

pub mod entities;
pub mod services;
pub mod value_objects;

// 重导出常用类型
pub use entities::{Message, NewMessage};
pub use services::{
    ChatMessage, ContextBuilder, ConversationWindow, CONFIG_ERROR_SENTINELS,
    DEFAULT_CONTEXT_WINDOW, DEFAULT_HISTORY_LIMIT, DEFAULT_SYSTEM_PROMPT, TranscriptCursor,
    TranscriptUpdate,
};
pub use value_objects::{MessageId, Sender};
