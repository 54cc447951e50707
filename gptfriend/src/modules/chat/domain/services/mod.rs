// Chat Domain - Services
// 领域服务封装不属于单个实体的业务逻辑

mod context_builder;
mod conversation_window;
mod persona;
mod transcript_cursor;

pub use context_builder::*;
pub use conversation_window::*;
pub use persona::*;
pub use transcript_cursor::*;
