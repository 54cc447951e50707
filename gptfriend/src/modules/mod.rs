// Modules Layer - 业务模块
//
// 按照六边形架构组织的业务模块：
// - chat: 聊天模块，消息存储、补全客户端和对话编排
// - config: 配置模块，处理应用设置
// - notification: 定时通知模块

pub mod chat;
pub mod config;
pub mod notification;

pub use chat::ChatModule;
pub use config::ConfigModule;
pub use notification::NotificationModule;
