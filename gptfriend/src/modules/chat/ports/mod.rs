// Chat Ports Layer
// 端口定义了模块与外部世界的接口

mod completion_client;
mod llm_port;
mod message_store;

pub use completion_client::*;
pub use llm_port::*;
pub use message_store::*;
