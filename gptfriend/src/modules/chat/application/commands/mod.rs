// Chat Commands - 命令定义和处理器

mod clear_conversation;
mod initialize_session;
mod send_message;

pub use clear_conversation::*;
pub use initialize_session::*;
pub use send_message::*;
